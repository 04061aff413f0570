use crate::atomic::{atomic_write_yaml, load_or_default};
use crate::error::TaskInterfaceResult;
use cloud_code_core::{
    CommitRecord, CredentialRequest, CredentialRequestStatus, FileChange, ReportStatus,
    ReportingDocument, Task, TaskStatus, TaskingDocument,
};
use std::collections::HashMap;
use std::path::Path;

/// Agent-side view of the Task Interface (C1): reads the tasks dispatched by
/// the orchestrator and reports progress back.
pub struct AgentTaskInterface;

impl AgentTaskInterface {
    /// Reads the tasking document written by the orchestrator.
    pub fn read_tasks(workspace_path: &Path) -> TaskInterfaceResult<TaskingDocument> {
        load_or_default(&tasking_path(workspace_path))
    }

    /// Returns the subset of tasks that are still `assigned` (not cancelled).
    pub fn get_pending_tasks(workspace_path: &Path) -> TaskInterfaceResult<Vec<Task>> {
        let doc = Self::read_tasks(workspace_path)?;
        Ok(doc
            .tasks
            .into_iter()
            .filter(|t| t.status == TaskStatus::Assigned)
            .collect())
    }

    /// Writes a fresh reporting document with an empty task map, replacing
    /// whatever was there before. Called once when the agent loop starts.
    pub fn initialize_agent(
        workspace_path: &Path,
        agent_type: &str,
        agent_id: &str,
    ) -> TaskInterfaceResult<()> {
        let doc = ReportingDocument::new(agent_type, agent_id);
        atomic_write_yaml(&reporting_path(workspace_path), &doc)?;
        Ok(())
    }

    /// Appends a progress entry for `task_id`, refreshes `current_step`, and
    /// flips the document's top-level status, then atomically replaces the
    /// reporting document.
    pub fn update_status(
        workspace_path: &Path,
        task_id: &str,
        status: ReportStatus,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> TaskInterfaceResult<()> {
        let path = reporting_path(workspace_path);
        let mut doc: ReportingDocument = load_or_default(&path)?;
        doc.report_mut(task_id)
            .push_progress(status, message, details)?;
        doc.touch();
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }

    /// Terminal transition helper: marks a task `completed` with a summary,
    /// plus the files it touched and the commit(s) it produced.
    pub fn set_task_completed(
        workspace_path: &Path,
        task_id: &str,
        summary: impl Into<String>,
        changes_summary: impl Into<String>,
        files_modified: Vec<FileChange>,
        commits: Vec<CommitRecord>,
    ) -> TaskInterfaceResult<()> {
        let path = reporting_path(workspace_path);
        let mut doc: ReportingDocument = load_or_default(&path)?;
        let report = doc.report_mut(task_id);
        report.push_progress(ReportStatus::Completed, "task completed", HashMap::new())?;
        report.summary = Some(summary.into());
        report.changes_summary = Some(changes_summary.into());
        report.files_modified.extend(files_modified);
        report.commits.extend(commits);
        doc.touch();
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }

    /// Terminal transition helper: marks a task `failed` with an error message.
    pub fn set_task_failed(
        workspace_path: &Path,
        task_id: &str,
        error: impl Into<String>,
    ) -> TaskInterfaceResult<()> {
        let path = reporting_path(workspace_path);
        let mut doc: ReportingDocument = load_or_default(&path)?;
        let error = error.into();
        let report = doc.report_mut(task_id);
        report.push_progress(ReportStatus::Failed, "task failed", HashMap::new())?;
        report.error = Some(error);
        doc.touch();
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }

    /// Terminal transition helper: marks a task `blocked` with a reason. Use
    /// the `recommend_handoff:<tool>` convention in `reason` to request a
    /// coding-tool handoff.
    pub fn set_task_blocked(
        workspace_path: &Path,
        task_id: &str,
        reason: impl Into<String>,
    ) -> TaskInterfaceResult<()> {
        let path = reporting_path(workspace_path);
        let mut doc: ReportingDocument = load_or_default(&path)?;
        let reason = reason.into();
        let report = doc.report_mut(task_id);
        report.push_progress(ReportStatus::Blocked, "task blocked", HashMap::new())?;
        report.blocked_reason = Some(reason);
        doc.touch();
        atomic_write_yaml(&path, &doc)?;
        Ok(())
    }

    /// Appends a new pending credential request to the task's report and
    /// returns its generated id.
    pub fn request_credential(
        workspace_path: &Path,
        task_id: &str,
        kind: impl Into<String>,
        scope: impl Into<String>,
        reason: impl Into<String>,
    ) -> TaskInterfaceResult<String> {
        let path = reporting_path(workspace_path);
        let mut doc: ReportingDocument = load_or_default(&path)?;
        let request_id = uuid::Uuid::new_v4().to_string();
        doc.report_mut(task_id).credential_requests.push(CredentialRequest {
            id: request_id.clone(),
            kind: kind.into(),
            scope: scope.into(),
            reason: reason.into(),
            status: CredentialRequestStatus::Pending,
        });
        doc.touch();
        atomic_write_yaml(&path, &doc)?;
        Ok(request_id)
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
