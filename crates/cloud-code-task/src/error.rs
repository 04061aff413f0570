use thiserror::Error;

/// Errors raised while reading or writing tasking/reporting documents.
#[derive(Debug, Error)]
pub enum TaskInterfaceError {
    /// Propagated from the shared data-model crate (document corruption, terminal
    /// transition violations, dependency cycles).
    #[error(transparent)]
    Core(#[from] cloud_code_core::CoreError),

    /// A plain filesystem error while reading, writing, or renaming a document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested task id is not present in the tasking document.
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

/// Convenience `Result` alias using [`TaskInterfaceError`].
pub type TaskInterfaceResult<T> = Result<T, TaskInterfaceError>;
