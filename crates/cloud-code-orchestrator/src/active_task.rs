use chrono::{DateTime, Utc};
use cloud_code_core::{Task, Worker, WorkspaceInfo};

/// Bookkeeping the orchestrator keeps for one in-flight task, independent of
/// either document. Lives only in process memory: a crash loses it, but the
/// underlying tasking/reporting documents are the source of truth an operator
/// can recover dispatch state from.
#[derive(Debug, Clone)]
pub struct ActiveTask {
    /// The task as last dispatched.
    pub task: Task,
    /// The worker container currently bound to it.
    pub worker: Worker,
    /// The workspace it was dispatched into.
    pub workspace: WorkspaceInfo,
    /// Repository owner, carried so a handoff re-dispatch doesn't need it
    /// threaded back in separately.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// `agent_type` this dispatch used.
    pub agent_type: String,
    /// Clone URL for the repository, kept so a handoff re-dispatch can reuse
    /// it without the caller threading it back in.
    pub clone_url: String,
    /// UTC timestamp this record was created.
    pub started_at: DateTime<Utc>,
    /// Number of handoffs already performed for this task id. Bounded at one
    /// additional attempt; a second handoff request is treated as terminal
    /// failure rather than re-dispatched again.
    pub handoff_count: u8,
}
