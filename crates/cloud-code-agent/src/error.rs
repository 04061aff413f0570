use thiserror::Error;

/// Errors surfaced by the agent control loop itself. Failures while running
/// the underlying coding tool are reported through the task's report, not
/// propagated as a hard error — see [`crate::control_loop::AgentLoop::run`].
#[derive(Debug, Error)]
pub enum AgentLoopError {
    #[error(transparent)]
    TaskInterface(#[from] cloud_code_task::TaskInterfaceError),

    #[error(transparent)]
    Tool(#[from] cloud_code_tools::ToolError),

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
}

/// Convenience alias for this crate's result type.
pub type AgentLoopResult<T> = Result<T, AgentLoopError>;
