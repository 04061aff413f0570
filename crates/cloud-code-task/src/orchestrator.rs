use crate::atomic::{atomic_write_yaml, load_or_default};
use crate::error::{TaskInterfaceError, TaskInterfaceResult};
use cloud_code_core::{
    CredentialRequestStatus, ReportingDocument, Task, TaskReport, TaskStatus, TaskingDocument,
};
use std::path::Path;

/// Orchestrator-side view of the Task Interface (C1): writes tasks into a
/// workspace and reads back the agent's reports.
pub struct OrchestratorTaskInterface;

impl OrchestratorTaskInterface {
    /// Loads the tasking document for `workspace_path`, upserts `task`, and
    /// atomically replaces the file on disk.
    pub fn write_task(workspace_path: &Path, workspace_id: &str, task: Task) -> TaskInterfaceResult<()> {
        let path = tasking_path(workspace_path);
        let mut doc: TaskingDocument = load_or_default(&path)?;
        if doc.workspace.is_empty() {
            doc.workspace = workspace_id.to_string();
        }
        doc.upsert_task(task);
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }

    /// Sets `status = cancelled` on the given task, atomically replacing the
    /// tasking document. No-op if the task id is absent.
    pub fn cancel_task(workspace_path: &Path, task_id: &str) -> TaskInterfaceResult<()> {
        let path = tasking_path(workspace_path);
        let mut doc: TaskingDocument = load_or_default(&path)?;
        let task = doc
            .task_mut(task_id)
            .ok_or_else(|| TaskInterfaceError::TaskNotFound(task_id.to_string()))?;
        task.status = TaskStatus::Cancelled;
        doc.updated_at = chrono::Utc::now();
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }

    /// Reads the agent's reporting document. Returns a default (empty,
    /// `idle`) document if the agent has not written one yet.
    pub fn read_report(workspace_path: &Path) -> TaskInterfaceResult<ReportingDocument> {
        load_or_default(&reporting_path(workspace_path))
    }

    /// Returns the report for a single task, if the reporting document exists
    /// and contains it.
    pub fn get_task_status(
        workspace_path: &Path,
        task_id: &str,
    ) -> TaskInterfaceResult<Option<TaskReport>> {
        let doc = Self::read_report(workspace_path)?;
        Ok(doc.report(task_id).cloned())
    }

    /// Grants the most recently raised pending credential request on a task.
    ///
    /// This is a deliberate, narrow exception to the "agent is the sole
    /// writer of the reporting document" invariant: a human approval
    /// (delivered via the `/cloud-code approve` comment command) has nowhere
    /// else to land, since the request itself lives in this document.
    pub fn approve_credential_request(workspace_path: &Path, task_id: &str) -> TaskInterfaceResult<()> {
        let path = reporting_path(workspace_path);
        let mut doc: ReportingDocument = load_or_default(&path)?;
        let report = doc
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| TaskInterfaceError::TaskNotFound(task_id.to_string()))?;
        let request = report
            .credential_requests
            .iter_mut()
            .rev()
            .find(|r| r.status == CredentialRequestStatus::Pending)
            .ok_or_else(|| TaskInterfaceError::TaskNotFound(format!("no pending credential request on {task_id}")))?;
        request.status = CredentialRequestStatus::Granted;
        doc.updated_at = chrono::Utc::now();
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }
}

fn tasking_path(workspace_path: &Path) -> std::path::PathBuf {
    workspace_path
        .join(cloud_code_core::METADATA_DIR)
        .join("tasking.yaml")
}

fn reporting_path(workspace_path: &Path) -> std::path::PathBuf {
    workspace_path
        .join(cloud_code_core::METADATA_DIR)
        .join("reporting.yaml")
}
