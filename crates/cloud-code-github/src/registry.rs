use parking_lot::Mutex;
use std::collections::HashMap;

/// Tracks which task id is currently bound to which issue, so comment
/// commands (which only know the issue number) can be translated into the
/// task id the orchestrator's active-task map is keyed by.
///
/// Purely in-memory, same lifetime and recovery story as the orchestrator's
/// own active-task map: a crash loses the mapping, but the underlying
/// tasking/reporting documents remain the source of truth.
#[derive(Default)]
pub struct IssueTaskRegistry {
    by_issue: Mutex<HashMap<u64, String>>,
}

impl IssueTaskRegistry {
    /// Builds an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `task_id` is now the active task for `issue_number`.
    pub fn bind(&self, issue_number: u64, task_id: impl Into<String>) {
        self.by_issue.lock().insert(issue_number, task_id.into());
    }

    /// Returns the task id currently bound to `issue_number`, if any.
    pub fn task_for_issue(&self, issue_number: u64) -> Option<String> {
        self.by_issue.lock().get(&issue_number).cloned()
    }

    /// Drops the binding for `issue_number`.
    pub fn unbind(&self, issue_number: u64) {
        self.by_issue.lock().remove(&issue_number);
    }
}
