use crate::report::{AgentStatus, TaskReport};
use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document format version. Bumped only on a breaking on-disk schema change.
pub const DOCUMENT_VERSION: u32 = 1;

/// The orchestrator-owned document placed in a workspace's `.cloud-code/` directory.
///
/// Single writer: the orchestrator. Single concurrent reader: the agent bound
/// to the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskingDocument {
    /// Schema version.
    pub version: u32,
    /// UTC timestamp of the last write.
    pub updated_at: DateTime<Utc>,
    /// Identifier of the workspace this document belongs to.
    pub workspace: String,
    /// Tasks dispatched into this workspace.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Default for TaskingDocument {
    /// An empty document with no workspace id set, used by readers when no
    /// document has been written yet.
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl TaskingDocument {
    /// Builds an empty document for the given workspace.
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            updated_at: Utc::now(),
            workspace: workspace.into(),
            tasks: Vec::new(),
        }
    }

    /// Replaces the task with the same id, or appends it if not present, then
    /// bumps `updated_at`.
    pub fn upsert_task(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        } else {
            self.tasks.push(task);
        }
        self.updated_at = Utc::now();
    }

    /// Returns the task with the given id, if present.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Returns a mutable reference to the task with the given id, if present.
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks currently assigned (not cancelled), in document order.
    pub fn assigned_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_assigned())
    }
}

/// The agent-owned document placed in a workspace's `.cloud-code/` directory.
///
/// Single writer: the agent. Single concurrent reader: the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingDocument {
    /// Schema version.
    pub version: u32,
    /// The agent type bound to this workspace (e.g. "backend", "reviewer").
    pub agent_type: String,
    /// Stable id of the agent instance that owns this document.
    pub agent_id: String,
    /// UTC timestamp of the last write.
    pub updated_at: DateTime<Utc>,
    /// Coarse working status of the agent itself.
    pub status: AgentStatus,
    /// Per-task reports, keyed by task id.
    #[serde(default)]
    pub tasks: HashMap<String, TaskReport>,
}

impl Default for ReportingDocument {
    /// An empty, agentless document, used by readers when no agent has
    /// written one yet.
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl ReportingDocument {
    /// Builds a fresh reporting document with an empty task map.
    pub fn new(agent_type: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            agent_type: agent_type.into(),
            agent_id: agent_id.into(),
            updated_at: Utc::now(),
            status: AgentStatus::Idle,
            tasks: HashMap::new(),
        }
    }

    /// Returns the report for a given task id, if present.
    pub fn report(&self, task_id: &str) -> Option<&TaskReport> {
        self.tasks.get(task_id)
    }

    /// Returns a mutable reference to the report for a given task id, creating
    /// one in the `Waiting` state if absent.
    pub fn report_mut(&mut self, task_id: &str) -> &mut TaskReport {
        self.tasks.entry(task_id.to_string()).or_default()
    }

    /// Marks the document's timestamp and top-level status, matching the
    /// convention that `status` flips to `Working` iff any task report is
    /// `InProgress`, else `Idle` (an agent report in `Error` is set explicitly
    /// by the caller and is never inferred here).
    pub fn touch(&mut self) {
        use crate::report::ReportStatus;
        if self.status != AgentStatus::Error {
            let any_in_progress = self
                .tasks
                .values()
                .any(|r| r.status == ReportStatus::InProgress);
            self.status = if any_in_progress {
                AgentStatus::Working
            } else {
                AgentStatus::Idle
            };
        }
        self.updated_at = Utc::now();
    }
}
