use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Agent-reported lifecycle state of a task.
///
/// Once a report reaches `Completed`, `Failed`, or `Blocked` no further
/// transition is permitted — see the monotonic-status invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Dispatched but not yet picked up by the agent loop.
    Waiting,
    /// Acknowledged by the agent; about to start planning.
    Received,
    /// Agent is building its execution prompt.
    Planning,
    /// Coding tool is actively running.
    InProgress,
    /// Agent cannot proceed without external input (e.g. a credential or a tool handoff).
    Blocked,
    /// Finished successfully.
    Completed,
    /// Finished with an unrecoverable error.
    Failed,
}

impl ReportStatus {
    /// Whether this status is terminal — no further transition is permitted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReportStatus::Completed | ReportStatus::Failed | ReportStatus::Blocked
        )
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportStatus::Waiting => "waiting",
            ReportStatus::Received => "received",
            ReportStatus::Planning => "planning",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Blocked => "blocked",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Top-level working state of the agent itself, independent of any one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// No assigned task is in progress.
    Idle,
    /// Actively executing a task.
    Working,
    /// The agent loop itself hit an unrecoverable error.
    Error,
}

/// A single append-only entry in a task report's progress log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// UTC timestamp of this entry.
    pub timestamp: DateTime<Utc>,
    /// Status at the time this entry was recorded.
    pub status: ReportStatus,
    /// Human-readable message.
    pub message: String,
    /// Arbitrary structured detail attached to this entry.
    #[serde(default)]
    pub details: HashMap<String, serde_json::Value>,
}

/// Kind of change applied to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// File did not exist before the change.
    Created,
    /// File existed and was edited.
    Modified,
    /// File existed and was removed.
    Deleted,
}

/// A single file touched by a task's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    /// Path relative to the workspace root.
    pub path: String,
    /// Kind of change applied.
    pub change_type: ChangeType,
    /// Lines added, if known.
    #[serde(default)]
    pub lines_added: u32,
    /// Lines removed, if known.
    #[serde(default)]
    pub lines_removed: u32,
}

/// A git commit recorded against a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit SHA (short form, 7 characters).
    pub sha: String,
    /// Commit message.
    pub message: String,
}

/// Status of a single acceptance criterion as judged by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    /// Not yet addressed.
    Pending,
    /// Actively being worked.
    InProgress,
    /// Satisfied.
    Done,
    /// Cannot be satisfied without outside help.
    Blocked,
}

/// Lifecycle state of a credential request raised mid-task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialRequestStatus {
    /// Raised, awaiting a human or automated grant.
    Pending,
    /// Granted; the agent may proceed.
    Granted,
    /// Explicitly refused.
    Denied,
}

/// A request for a credential the agent cannot source itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRequest {
    /// Unique id for this request, scoped to the task.
    pub id: String,
    /// Credential kind (e.g. "api_key", "deploy_token").
    #[serde(rename = "type")]
    pub kind: String,
    /// Scope the credential is requested for.
    pub scope: String,
    /// Why the agent needs it.
    pub reason: String,
    /// Current lifecycle status of the request.
    pub status: CredentialRequestStatus,
}

/// The agent's evolving view of a single task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    /// Current lifecycle status.
    pub status: ReportStatus,
    /// UTC timestamp the agent first picked up the task.
    pub started_at: Option<DateTime<Utc>>,
    /// Short label for whatever the agent is doing right now.
    pub current_step: Option<String>,
    /// Append-only progress log.
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
    /// Files touched so far.
    #[serde(default)]
    pub files_modified: Vec<FileChange>,
    /// Commits made so far.
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
    /// Status per acceptance criterion, parallel to the task's own list.
    #[serde(default)]
    pub acceptance_criteria_status: Vec<CriterionStatus>,
    /// Human-readable summary, set on completion.
    pub summary: Option<String>,
    /// Human-readable description of the net changes, set on completion.
    pub changes_summary: Option<String>,
    /// Populated when `status == Failed`.
    pub error: Option<String>,
    /// Populated when `status == Blocked`. May carry the `recommend_handoff:<tool>` convention.
    pub blocked_reason: Option<String>,
    /// Outstanding or resolved credential requests.
    #[serde(default)]
    pub credential_requests: Vec<CredentialRequest>,
}

impl TaskReport {
    /// Builds a fresh report in the `Waiting` state.
    pub fn new() -> Self {
        Self {
            status: ReportStatus::Waiting,
            started_at: None,
            current_step: None,
            progress: Vec::new(),
            files_modified: Vec::new(),
            commits: Vec::new(),
            acceptance_criteria_status: Vec::new(),
            summary: None,
            changes_summary: None,
            error: None,
            blocked_reason: None,
            credential_requests: Vec::new(),
        }
    }

    /// Appends a progress entry and updates `current_step` and `status`.
    ///
    /// Returns an error if the report is already in a terminal state.
    pub fn push_progress(
        &mut self,
        status: ReportStatus,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Result<(), crate::error::CoreError> {
        if self.status.is_terminal() {
            return Err(crate::error::CoreError::AlreadyTerminal {
                status: self.status.to_string(),
            });
        }
        let message = message.into();
        self.current_step = Some(message.clone());
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        self.progress.push(ProgressEntry {
            timestamp: Utc::now(),
            status,
            message,
            details,
        });
        self.status = status;
        Ok(())
    }
}

impl Default for TaskReport {
    fn default() -> Self {
        Self::new()
    }
}
