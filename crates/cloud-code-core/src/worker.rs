use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A provisioned container running a coding tool, tracked by the provisioner's
/// registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Container id as reported by the container runtime.
    pub container_id: String,
    /// Human-readable container name.
    pub name: String,
    /// Agent role this worker was provisioned for (e.g. "backend", "reviewer").
    pub agent_type: String,
    /// Coding tool installed and configured in this container.
    pub coding_tool: String,
    /// Workspace path mounted into the container, if currently bound to one.
    pub workspace_path: Option<PathBuf>,
    /// Whether this worker currently has a task bound to it.
    pub busy: bool,
}

impl Worker {
    /// Builds a freshly provisioned, idle worker.
    pub fn new(
        container_id: impl Into<String>,
        name: impl Into<String>,
        agent_type: impl Into<String>,
        coding_tool: impl Into<String>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            name: name.into(),
            agent_type: agent_type.into(),
            coding_tool: coding_tool.into(),
            workspace_path: None,
            busy: false,
        }
    }

    /// Binds this worker to a workspace and marks it busy.
    pub fn bind(&mut self, workspace_path: PathBuf) {
        self.workspace_path = Some(workspace_path);
        self.busy = true;
    }

    /// Releases this worker from its bound workspace and marks it idle.
    pub fn release(&mut self) {
        self.workspace_path = None;
        self.busy = false;
    }

    /// Whether this worker is idle and matches the requested agent type.
    pub fn is_idle_for(&self, agent_type: &str) -> bool {
        !self.busy && self.agent_type == agent_type
    }
}
