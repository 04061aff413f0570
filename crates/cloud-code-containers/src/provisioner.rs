use crate::config::{default_configs, AgentTypeConfig};
use crate::docker;
use crate::error::{ContainerError, ContainerResult};
use async_trait::async_trait;
use bollard::Docker;
use cloud_code_core::Worker;
use cloud_code_secrets::{agent_env, SecretStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Capability surface the orchestrator needs from a worker pool.
///
/// Kept as a trait so callers can inject a fake pool in tests rather than
/// depend on a live container runtime; [`ContainerProvisioner`] is the real
/// implementation.
#[async_trait]
pub trait WorkerProvisioner: Send + Sync {
    /// Returns an idle worker of `agent_type` bound to `workspace`,
    /// provisioning one if none is available.
    async fn get_or_create_agent(&self, agent_type: &str, workspace: &Path) -> ContainerResult<Worker>;

    /// Stops and removes a worker, dropping it from the pool. Called once a
    /// dispatched task reaches a terminal outcome — the workspace bind mount
    /// is fixed for the container's lifetime, so there is nothing left for
    /// it to pick up once its one task is done.
    async fn remove_agent(&self, container_id: &str) -> ContainerResult<()>;
}

/// Releases a worker's `busy` flag on drop, regardless of how the scope that
/// holds the guard exits. This is what backs the "busy set before exec,
/// cleared by a guaranteed-release wrapper" invariant.
struct BusyGuard<'a> {
    workers: &'a Mutex<HashMap<String, Worker>>,
    container_id: String,
}

impl<'a> BusyGuard<'a> {
    fn new(workers: &'a Mutex<HashMap<String, Worker>>, container_id: String) -> Self {
        Self { workers, container_id }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(worker) = self.workers.lock().get_mut(&self.container_id) {
            worker.release();
        }
    }
}

/// Manages the pool of worker containers, one per `(agent_type, coding_tool)`
/// role currently in use.
pub struct ContainerProvisioner {
    client: Docker,
    network: String,
    configs: HashMap<String, AgentTypeConfig>,
    secrets: Arc<dyn SecretStore>,
    workers: Mutex<HashMap<String, Worker>>,
}

impl ContainerProvisioner {
    /// Connects to the local Docker daemon and builds a provisioner using
    /// the standard agent-type table.
    pub fn new(network: impl Into<String>, secrets: Arc<dyn SecretStore>) -> ContainerResult<Self> {
        let client = Docker::connect_with_local_defaults()?;
        Ok(Self {
            client,
            network: network.into(),
            configs: default_configs(),
            secrets,
            workers: Mutex::new(HashMap::new()),
        })
    }

    /// Snapshot of every worker currently tracked by this provisioner.
    pub fn workers(&self) -> Vec<Worker> {
        self.workers.lock().values().cloned().collect()
    }

    fn config_for(&self, agent_type: &str) -> ContainerResult<&AgentTypeConfig> {
        self.configs
            .get(agent_type)
            .ok_or_else(|| ContainerError::UnknownAgentType(agent_type.to_string()))
    }

    /// Starts a fresh container for `agent_type`, bind-mounting `workspace`
    /// (if given) at `/workspace` and injecting secret-store credentials for
    /// its coding tool plus any caller-supplied overrides.
    pub async fn provision_agent(
        &self,
        agent_type: &str,
        name: Option<String>,
        workspace: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> ContainerResult<Worker> {
        let config = self.config_for(agent_type)?.clone();
        let name = name.unwrap_or_else(|| format!("cloud-code-{agent_type}-{}", uuid::Uuid::new_v4()));

        let mut full_env = agent_env(self.secrets.as_ref(), &config.coding_tool).await;
        full_env.extend(config.extra_env.clone());
        full_env.insert("AGENT_TYPE".to_string(), agent_type.to_string());
        full_env.insert("AGENT_ID".to_string(), name.clone());
        full_env.insert("CODING_TOOL".to_string(), config.coding_tool.clone());
        full_env.insert("WORKSPACE".to_string(), "/workspace".to_string());
        if let Some(overrides) = env {
            full_env.extend(overrides);
        }

        let container_id = docker::create_and_start(
            &self.client,
            &name,
            &self.network,
            &config,
            workspace.as_deref(),
            &full_env,
        )
        .await?;

        info!(container_id = %container_id, agent_type, "worker container provisioned");

        let mut worker = Worker::new(container_id.clone(), name, agent_type, config.coding_tool.clone());
        if let Some(path) = workspace {
            worker.bind(path);
        }

        self.workers.lock().insert(container_id, worker.clone());
        Ok(worker)
    }

    /// Returns an idle worker of `agent_type` bound to `workspace`, reusing
    /// one already bound to it, reusing-and-rebinding one that is idle but
    /// unbound, or stopping and re-provisioning one bound to a different
    /// workspace (a bind mount cannot be retargeted after creation).
    pub async fn get_or_create_agent(
        &self,
        agent_type: &str,
        workspace: &Path,
    ) -> ContainerResult<Worker> {
        let reusable = {
            let workers = self.workers.lock();
            workers
                .values()
                .find(|w| w.is_idle_for(agent_type))
                .cloned()
        };

        match reusable {
            Some(mut worker) if worker.workspace_path.as_deref() == Some(workspace) => {
                worker.bind(workspace.to_path_buf());
                self.workers.lock().insert(worker.container_id.clone(), worker.clone());
                Ok(worker)
            }
            Some(stale) => {
                warn!(
                    container_id = %stale.container_id,
                    "idle worker bound to a different workspace, reprovisioning"
                );
                self.remove_agent(&stale.container_id).await?;
                self.provision_agent(agent_type, None, Some(workspace.to_path_buf()), None)
                    .await
            }
            None => {
                self.provision_agent(agent_type, None, Some(workspace.to_path_buf()), None)
                    .await
            }
        }
    }

    /// Runs `argv` inside `worker`'s container, releasing its `busy` flag
    /// when the call returns regardless of outcome.
    pub async fn execute_in_agent(
        &self,
        worker: &Worker,
        argv: Vec<String>,
        workdir: &str,
        timeout: Duration,
    ) -> ContainerResult<(i64, String, String)> {
        let _guard = BusyGuard::new(&self.workers, worker.container_id.clone());
        docker::exec(&self.client, &worker.container_id, &argv, workdir, timeout).await
    }

    /// A worker is healthy iff its container is running.
    pub async fn health_check(&self, worker: &Worker) -> ContainerResult<bool> {
        docker::is_running(&self.client, &worker.container_id).await
    }

    /// Stops a container without removing it.
    pub async fn stop_agent(&self, container_id: &str) -> ContainerResult<()> {
        docker::stop(&self.client, container_id).await
    }

    /// Stops and removes a container, dropping it from the pool.
    pub async fn remove_agent(&self, container_id: &str) -> ContainerResult<()> {
        docker::stop_and_remove(&self.client, container_id).await?;
        self.workers.lock().remove(container_id);
        Ok(())
    }

    /// Stops and removes every tracked worker.
    pub async fn cleanup_all(&self) -> ContainerResult<()> {
        let ids: Vec<String> = self.workers.lock().keys().cloned().collect();
        for id in ids {
            if let Err(e) = self.remove_agent(&id).await {
                warn!(container_id = %id, error = %e, "failed to clean up worker");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl WorkerProvisioner for ContainerProvisioner {
    async fn get_or_create_agent(&self, agent_type: &str, workspace: &Path) -> ContainerResult<Worker> {
        ContainerProvisioner::get_or_create_agent(self, agent_type, workspace).await
    }

    async fn remove_agent(&self, container_id: &str) -> ContainerResult<()> {
        ContainerProvisioner::remove_agent(self, container_id).await
    }
}
