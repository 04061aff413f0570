use thiserror::Error;

/// Errors raised while provisioning or driving worker containers.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("docker daemon error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("unknown agent type: {0}")]
    UnknownAgentType(String),

    #[error("no worker found for container id {0}")]
    WorkerNotFound(String),

    #[error("container {container_id} is not running (health check failed)")]
    Unhealthy { container_id: String },
}

/// Convenience alias for this crate's result type.
pub type ContainerResult<T> = Result<T, ContainerError>;
