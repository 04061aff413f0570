use thiserror::Error;

/// Errors raised while provisioning or reclaiming a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A git operation (clone, fetch, worktree add/remove, checkout) failed.
    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    /// A plain filesystem error, e.g. while copying a copy-on-write checkout.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// `.cloud-code/` could not be created inside a provisioned workspace.
    #[error("failed to initialize metadata directory at {path}")]
    MetadataInit {
        /// Path that failed to be created.
        path: String,
    },
}

/// Convenience `Result` alias using [`WorkspaceError`].
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
