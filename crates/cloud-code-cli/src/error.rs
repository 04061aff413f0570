use thiserror::Error;

/// Top-level error composing every crate's error type, for reporting at the
/// process boundary. No binary-specific variants beyond configuration
/// loading live here — everything else is a lower-level error passed
/// through unchanged.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read config file '{path}': {source}")]
    ReadConfig { path: String, source: std::io::Error },

    #[error("failed to parse config file '{path}': {source}")]
    ParseConfig { path: String, source: toml::de::Error },

    #[error(transparent)]
    Workspace(#[from] cloud_code_workspace::WorkspaceError),

    #[error(transparent)]
    Container(#[from] cloud_code_containers::ContainerError),

    #[error(transparent)]
    Orchestrator(#[from] cloud_code_orchestrator::OrchestratorError),

    #[error(transparent)]
    AgentLoop(#[from] cloud_code_agent::AgentLoopError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
