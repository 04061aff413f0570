use crate::error::SecretResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// Logical path conventions used to namespace secrets, mirroring the layout
/// of the external vault this crate fronts.
pub mod paths {
    /// Per-coding-tool API keys and model overrides: `cloud-code/cli/{tool}`.
    pub fn cli(tool: &str) -> String {
        format!("cloud-code/cli/{tool}")
    }

    /// The GitHub App's own credentials.
    pub fn github_app() -> String {
        "cloud-code/github/app".to_string()
    }

    /// Per-installation GitHub tokens: `cloud-code/github/installations/{id}`.
    pub fn github_installation(installation_id: &str) -> String {
        format!("cloud-code/github/installations/{installation_id}")
    }

    /// Per-user, per-provider credentials: `cloud-code/users/{uid}/{provider}`.
    pub fn user_provider(user_id: &str, provider: &str) -> String {
        format!("cloud-code/users/{user_id}/{provider}")
    }
}

/// A backend capable of resolving secrets by logical path and key.
///
/// Implementations front an external secret manager (e.g. Vault); this crate
/// only defines the interface and a simple reference implementation, since
/// provisioning and rotating the backing store is outside this system's
/// scope.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches a single key within a logical path, e.g. `("cloud-code/cli/aider", "ANTHROPIC_API_KEY")`.
    async fn get(&self, path: &str, key: &str) -> SecretResult<String>;

    /// Fetches every key within a logical path, if the store supports bulk reads.
    async fn get_all(&self, path: &str) -> SecretResult<HashMap<String, String>>;
}

/// Maps a container's `(agent_type, coding_tool)` pair to the environment
/// variables its subprocess needs, pulling each value from `store`.
///
/// Keys absent from the store are simply omitted from the result — a
/// missing optional credential (e.g. no `CLAUDE_CODE_MODEL` override) is not
/// an error, it just means the tool falls back to its own default.
pub async fn agent_env(
    store: &dyn SecretStore,
    coding_tool: &str,
) -> HashMap<String, String> {
    let keys: &[&str] = match coding_tool {
        "claude-code" => &["ANTHROPIC_API_KEY", "CLAUDE_CODE_MODEL"],
        "aider" => &["ANTHROPIC_API_KEY", "OPENAI_API_KEY", "AIDER_MODEL"],
        "codex" => &["OPENAI_API_KEY"],
        "gemini" => &["GOOGLE_API_KEY"],
        "continue" => &["CONTINUE_API_KEY"],
        "cursor" => &["CURSOR_API_KEY"],
        _ => &[],
    };

    let path = paths::cli(coding_tool);
    let mut env = HashMap::new();
    for key in keys {
        if let Ok(value) = store.get(&path, key).await {
            env.insert((*key).to_string(), value);
        }
    }
    env
}
