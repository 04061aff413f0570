//! Shared data model for Cloud Code: tasks, reports, documents, workspaces, and workers.
//!
//! This crate defines the on-disk and in-memory shapes every other Cloud Code
//! crate agrees on. It owns no I/O — document (de)serialization and atomic
//! file replacement live in `cloud-code-task`, which depends on these types.
//!
//! # Main types
//!
//! - [`Task`] / [`Priority`] / [`TaskStatus`] — the unit of work and its orchestrator-side state.
//! - [`TaskReport`] / [`ReportStatus`] — the agent's view of a task's progress.
//! - [`TaskingDocument`] / [`ReportingDocument`] — the two documents exchanged through a workspace.
//! - [`WorkspaceInfo`] — a provisioned checkout bound to a task.
//! - [`Worker`] — a provisioned container tracked by the container provisioner.
//! - [`CoreError`] — shared error type for document and state-transition failures.

/// Tasking/reporting document shapes and update helpers.
pub mod document;
/// Shared error type.
pub mod error;
/// Task reports: progress, file changes, commits, credential requests.
pub mod report;
/// Tasks: priority, status, dependencies, context.
pub mod task;
/// Provisioned workers (containers running a coding tool).
pub mod worker;
/// Provisioned workspaces (checkouts bound to a task).
pub mod workspace;

pub use document::{ReportingDocument, TaskingDocument, DOCUMENT_VERSION};
pub use error::{CoreError, CoreResult};
pub use report::{
    AgentStatus, ChangeType, CommitRecord, CredentialRequest, CredentialRequestStatus,
    CriterionStatus, FileChange, ProgressEntry, ReportStatus, TaskReport,
};
pub use task::{Priority, Task, TaskContext, TaskStatus, WorkspaceMode};
pub use worker::Worker;
pub use workspace::{main_checkout_name, worktree_dir, WorkspaceInfo, METADATA_DIR};
