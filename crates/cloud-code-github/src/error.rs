use thiserror::Error;

/// Errors raised while turning a GitHub event into a dispatched task.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error(transparent)]
    Orchestrator(#[from] cloud_code_orchestrator::OrchestratorError),

    #[error(transparent)]
    Task(#[from] cloud_code_task::TaskInterfaceError),

    #[error("webhook signature missing or invalid")]
    InvalidSignature,

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("no task is currently tracked for issue #{0}")]
    NoActiveTaskForIssue(u64),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Convenience alias for this crate's result type.
pub type GithubResult<T> = Result<T, GithubError>;
