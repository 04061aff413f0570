//! Layered configuration for both binaries, loaded from a `toml` file and
//! overridable by CLI flags.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for the `cloud-code-server` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Directory under which every task's workspace is provisioned.
    #[serde(default = "default_workspaces_root")]
    pub workspaces_root: PathBuf,
    /// Docker network new worker containers join.
    #[serde(default = "default_docker_network")]
    pub docker_network: String,
    /// How often the supervisor polls every active task's report.
    #[serde(default = "default_poll_interval_secs", rename = "poll_interval_secs")]
    poll_interval_secs: u64,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            workspaces_root: default_workspaces_root(),
            docker_network: default_docker_network(),
            poll_interval_secs: default_poll_interval_secs(),
            github: GithubConfig::default(),
            server: HttpConfig::default(),
            secrets: SecretsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Webhook-facing configuration for the GitHub event adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// Secret used to verify `X-Hub-Signature-256`. Absent disables
    /// verification, matching the reference behavior for unconfigured
    /// webhook sources.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Token used to authenticate REST calls (PR creation, comments).
    #[serde(default)]
    pub api_token: Option<String>,
    /// Branch new pull requests are opened against.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Workspace isolation mode used for every dispatch from this adapter.
    #[serde(default = "default_workspace_mode")]
    pub workspace_mode: cloud_code_core::WorkspaceMode,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            api_token: None,
            base_branch: default_base_branch(),
            workspace_mode: default_workspace_mode(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Which [`cloud_code_secrets::SecretStore`] backend to construct.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    #[serde(default = "default_secrets_backend")]
    pub backend: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self { backend: default_secrets_backend() }
    }
}

/// Top-level configuration for the `cloud-code-agent` binary, read from
/// inside a worker container.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// How long to sleep between reads of the tasking document when idle.
    #[serde(default = "default_idle_poll_interval_secs", rename = "idle_poll_interval_secs")]
    idle_poll_interval_secs: u64,
    /// Maximum wall-clock time a single coding-tool invocation may run.
    #[serde(default = "default_agent_timeout_secs", rename = "agent_timeout_secs")]
    agent_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            idle_poll_interval_secs: default_idle_poll_interval_secs(),
            agent_timeout_secs: default_agent_timeout_secs(),
        }
    }
}

impl AgentConfig {
    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_secs(self.idle_poll_interval_secs)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }
}

fn default_workspaces_root() -> PathBuf {
    PathBuf::from("./workspaces")
}
fn default_docker_network() -> String {
    "cloud-code".to_string()
}
fn default_poll_interval_secs() -> u64 {
    10
}
fn default_base_branch() -> String {
    "main".to_string()
}
fn default_workspace_mode() -> cloud_code_core::WorkspaceMode {
    cloud_code_core::WorkspaceMode::Isolated
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_secrets_backend() -> String {
    "env".to_string()
}
fn default_idle_poll_interval_secs() -> u64 {
    5
}
fn default_agent_timeout_secs() -> u64 {
    1800
}

/// Loads and parses a `toml` config file, falling back to every field's
/// default for an empty or absent document.
pub fn load<T: Default + serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> crate::error::CliResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::CliError::ReadConfig {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| crate::error::CliError::ParseConfig {
        path: path.display().to_string(),
        source: e,
    })
}
