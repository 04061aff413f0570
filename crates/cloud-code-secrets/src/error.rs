use thiserror::Error;

/// Errors raised while resolving a secret.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The requested path/key combination has no value in this store.
    #[error("secret not found at {path}/{key}")]
    NotFound {
        /// Logical path the secret was requested under.
        path: String,
        /// Key within that path.
        key: String,
    },

    /// The backing store could not be reached or returned malformed data.
    #[error("secret backend error: {0}")]
    Backend(String),
}

/// Convenience `Result` alias using [`SecretError`].
pub type SecretResult<T> = Result<T, SecretError>;
