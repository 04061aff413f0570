use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Relative priority of a [`Task`]. Ordered `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Lowest priority; scheduled last among eligible tasks.
    Low,
    /// Default priority for ordinary work.
    Medium,
    /// Scheduled ahead of medium and low priority tasks.
    High,
    /// Scheduled ahead of every other priority.
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Orchestrator-writable lifecycle state of a [`Task`].
///
/// A task never leaves `Assigned` on its own; `Cancelled` is the only
/// terminal state the orchestrator may set directly. Further progress is
/// tracked on the agent's [`crate::TaskReport`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Dispatched into a workspace and visible to the bound agent.
    Assigned,
    /// Withdrawn by the orchestrator; the agent must stop working on it.
    Cancelled,
}

/// Isolation mode used when a task's workspace is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Task-private worktree sharing one object store.
    Shared,
    /// Independent fresh clone for the task.
    Isolated,
    /// Byte-copy of the cached main checkout.
    CopyOnWrite,
}

/// Supplementary context attached to a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskContext {
    /// Paths (relative to the workspace root) the agent should focus on.
    #[serde(default)]
    pub related_files: Vec<String>,
    /// Free-text dependency notes (libraries, prior art, external services).
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// The unit of work dispatched by the orchestrator into a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique id, derived from the source event id plus a random suffix.
    pub id: String,
    /// Short human-readable title.
    pub title: String,
    /// Full task description.
    pub description: String,
    /// Target branch name inside the workspace.
    pub branch: String,
    /// Scheduling priority.
    pub priority: Priority,
    /// Orchestrator-controlled lifecycle status.
    pub status: TaskStatus,
    /// Ids of tasks that must reach `completed` before this one is eligible.
    #[serde(default)]
    pub depends_on: HashSet<String>,
    /// Ordered list of acceptance criteria, shown to the agent verbatim.
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Supplementary context for the agent.
    #[serde(default)]
    pub context: TaskContext,
    /// Workspace isolation mode this task was dispatched under.
    pub workspace_mode: WorkspaceMode,
    /// UTC timestamp of task creation.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new task with default priority, no dependencies, and `Assigned` status.
    pub fn new(id: impl Into<String>, title: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            branch: branch.into(),
            priority: Priority::Medium,
            status: TaskStatus::Assigned,
            depends_on: HashSet::new(),
            acceptance_criteria: Vec::new(),
            context: TaskContext::default(),
            workspace_mode: WorkspaceMode::Shared,
            created_at: Utc::now(),
        }
    }

    /// Sets the priority and returns `self` for chaining.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the description and returns `self` for chaining.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a dependency id and returns `self` for chaining.
    pub fn depends_on(mut self, task_id: impl Into<String>) -> Self {
        self.depends_on.insert(task_id.into());
        self
    }

    /// Sets the acceptance criteria list and returns `self` for chaining.
    pub fn with_acceptance_criteria(mut self, criteria: Vec<String>) -> Self {
        self.acceptance_criteria = criteria;
        self
    }

    /// Sets the supplementary context and returns `self` for chaining.
    pub fn with_context(mut self, context: TaskContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the workspace isolation mode and returns `self` for chaining.
    pub fn with_workspace_mode(mut self, mode: WorkspaceMode) -> Self {
        self.workspace_mode = mode;
        self
    }

    /// Whether this task is still live from the orchestrator's perspective.
    pub fn is_assigned(&self) -> bool {
        self.status == TaskStatus::Assigned
    }
}
