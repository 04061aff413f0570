use thiserror::Error;

/// Errors raised by the dispatch pipeline and supervisor loop.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Workspace(#[from] cloud_code_workspace::WorkspaceError),

    #[error(transparent)]
    Task(#[from] cloud_code_task::TaskInterfaceError),

    #[error(transparent)]
    Container(#[from] cloud_code_containers::ContainerError),

    #[error("no active record for task {0}")]
    TaskNotActive(String),
}

/// Convenience alias for this crate's result type.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
