use crate::active_task::ActiveTask;
use async_trait::async_trait;
use cloud_code_core::TaskReport;

/// Side effects run when a task's report reaches a terminal status.
///
/// Kept as a trait so the pieces that talk to the source-control provider
/// (opening a pull request, posting a comment) stay out of this crate and
/// testable in isolation; the polling loop only knows it must call one of
/// these three methods once per terminal transition.
#[async_trait]
pub trait OrchestratorHooks: Send + Sync {
    /// The task finished successfully.
    async fn on_completed(&self, active: &ActiveTask, report: &TaskReport);
    /// The task finished with an unrecoverable error.
    async fn on_failed(&self, active: &ActiveTask, report: &TaskReport);
    /// The task is blocked on something other than a tool handoff (e.g. a
    /// credential request) and needs a human.
    async fn on_blocked_for_human(&self, active: &ActiveTask, report: &TaskReport);
}

/// Hooks implementation that does nothing; useful for tests and for running
/// the orchestrator without any external collaborator wired up.
pub struct NoopHooks;

#[async_trait]
impl OrchestratorHooks for NoopHooks {
    async fn on_completed(&self, _active: &ActiveTask, _report: &TaskReport) {}
    async fn on_failed(&self, _active: &ActiveTask, _report: &TaskReport) {}
    async fn on_blocked_for_human(&self, _active: &ActiveTask, _report: &TaskReport) {}
}
