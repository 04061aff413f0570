use thiserror::Error;

/// Errors raised while invoking a coding tool's subprocess.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool's binary could not be spawned at all (likely not installed).
    #[error("failed to spawn '{binary}': {source}")]
    Spawn {
        /// The binary that failed to launch.
        binary: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The subprocess ran past its allotted timeout and was killed.
    #[error("Task timed out after {0} seconds")]
    Timeout(u64),

    /// No coding tool with this name is registered.
    #[error("unknown coding tool: {0}")]
    UnknownTool(String),

    /// Every tool in the registry reported itself unavailable.
    #[error("no coding tool is available on this host")]
    NoToolAvailable,
}

/// Convenience `Result` alias using [`ToolError`].
pub type ToolResult<T> = Result<T, ToolError>;
