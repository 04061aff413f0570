//! Round-trip and invariant tests for the tasking/reporting document model.

use cloud_code_core::report::ReportStatus;
use cloud_code_core::task::{Priority, Task, WorkspaceMode};
use cloud_code_core::{ReportingDocument, TaskingDocument};
use std::collections::HashMap;

#[test]
fn tasking_document_upsert_replaces_by_id() {
    let mut doc = TaskingDocument::new("acme-widgets");
    let task = Task::new("issue-12-abcd1234", "Fix the thing", "cloud-code/issue-12")
        .with_priority(Priority::High);
    doc.upsert_task(task.clone());
    assert_eq!(doc.tasks.len(), 1);

    let mut updated = task.clone();
    updated.description = "now with a description".to_string();
    doc.upsert_task(updated);

    assert_eq!(doc.tasks.len(), 1);
    assert_eq!(
        doc.task("issue-12-abcd1234").unwrap().description,
        "now with a description"
    );
}

#[test]
fn tasking_document_roundtrips_through_yaml() {
    let mut doc = TaskingDocument::new("acme-widgets");
    doc.upsert_task(
        Task::new("t1", "Add retries", "cloud-code/t1")
            .with_priority(Priority::Critical)
            .depends_on("t0"),
    );

    let serialized = serde_yaml::to_string(&doc).expect("serialize");
    let parsed: TaskingDocument = serde_yaml::from_str(&serialized).expect("parse");

    assert_eq!(parsed.workspace, "acme-widgets");
    assert_eq!(parsed.tasks.len(), 1);
    assert_eq!(parsed.tasks[0].priority, Priority::Critical);
    assert!(parsed.tasks[0].depends_on.contains("t0"));
}

#[test]
fn missing_document_on_disk_is_treated_as_empty_by_readers() {
    // Readers in cloud-code-task are responsible for the missing-file ->
    // empty-document fallback; here we just assert the empty document itself
    // is well-formed and round-trips.
    let doc = TaskingDocument::new("acme-widgets");
    assert!(doc.tasks.is_empty());
    let serialized = serde_yaml::to_string(&doc).expect("serialize");
    let parsed: TaskingDocument = serde_yaml::from_str(&serialized).expect("parse");
    assert!(parsed.tasks.is_empty());
}

#[test]
fn task_workspace_mode_defaults_to_shared() {
    let task = Task::new("t1", "title", "branch");
    assert_eq!(task.workspace_mode, WorkspaceMode::Shared);
}

#[test]
fn report_status_transitions_refuse_once_terminal() {
    let mut report = cloud_code_core::TaskReport::new();
    report
        .push_progress(ReportStatus::InProgress, "working", HashMap::new())
        .unwrap();
    report
        .push_progress(ReportStatus::Completed, "done", HashMap::new())
        .unwrap();

    let result = report.push_progress(ReportStatus::InProgress, "oops", HashMap::new());
    assert!(result.is_err());
}

#[test]
fn reporting_document_touch_reflects_in_progress_tasks() {
    let mut doc = ReportingDocument::new("backend", "agent-1");
    assert_eq!(doc.status, cloud_code_core::AgentStatus::Idle);

    doc.report_mut("t1")
        .push_progress(ReportStatus::InProgress, "working", HashMap::new())
        .unwrap();
    doc.touch();
    assert_eq!(doc.status, cloud_code_core::AgentStatus::Working);

    doc.report_mut("t1")
        .push_progress(ReportStatus::Completed, "done", HashMap::new())
        .unwrap();
    doc.touch();
    assert_eq!(doc.status, cloud_code_core::AgentStatus::Idle);
}
