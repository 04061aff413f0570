use thiserror::Error;

/// Top-level error type for the shared data-model crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A tasking or reporting document failed to parse.
    #[error("document corrupt at {path}: {source}")]
    DocumentCorrupt {
        /// Path to the offending document.
        path: String,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },

    /// An atomic write (tmp + fsync + rename) failed.
    #[error("failed to write document {path}: {source}")]
    WriteFailed {
        /// Path the write was targeting.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The requested task id does not exist in the document.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// `depends_on` among a task set forms a cycle.
    #[error("dependency cycle detected involving task {0}")]
    DependencyCycle(String),

    /// A status transition was attempted on a report already in a terminal state.
    #[error("report already terminal ({status}), refusing transition")]
    AlreadyTerminal {
        /// The terminal status currently held.
        status: String,
    },

    /// A plain I/O error not covered by a more specific variant.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
