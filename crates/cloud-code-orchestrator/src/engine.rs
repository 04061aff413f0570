use crate::active_task::ActiveTask;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::hooks::OrchestratorHooks;
use cloud_code_containers::WorkerProvisioner;
use cloud_code_core::{ReportStatus, Task, WorkspaceMode};
use cloud_code_task::OrchestratorTaskInterface;
use cloud_code_workspace::WorkspaceManager;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// One additional handoff per task is permitted before a blocked report is
/// treated as terminal failure. See the design notes on the handoff-depth
/// bound.
const MAX_HANDOFFS: u8 = 1;

/// Owns the dispatch pipeline and the supervisor polling loop.
///
/// There is no shared in-memory state with any worker: coordination is
/// entirely through the tasking/reporting documents. The `active` map below
/// is purely this process's bookkeeping of what it has dispatched and is
/// still waiting to hear back about.
pub struct Orchestrator {
    workspaces: WorkspaceManager,
    containers: Arc<dyn WorkerProvisioner>,
    hooks: Arc<dyn OrchestratorHooks>,
    active: Mutex<HashMap<String, ActiveTask>>,
    running: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Builds an orchestrator over a workspace root and a worker pool,
    /// driving the given terminal-status hooks.
    pub fn new(
        workspaces: WorkspaceManager,
        containers: Arc<dyn WorkerProvisioner>,
        hooks: Arc<dyn OrchestratorHooks>,
    ) -> Self {
        Self {
            workspaces,
            containers,
            hooks,
            active: Mutex::new(HashMap::new()),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns a handle that `start_monitoring`'s caller can flip to stop the
    /// supervisor loop at its next iteration boundary.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Snapshot of every task id currently tracked as active.
    pub fn active_task_ids(&self) -> Vec<String> {
        self.active.lock().keys().cloned().collect()
    }

    /// Provisions a workspace, writes the task into it, binds a worker to it,
    /// and registers the dispatch in the active-task map.
    ///
    /// Returns the bound worker's container id. A worker loop will discover
    /// the task within one poll interval of its own.
    #[allow(clippy::too_many_arguments)]
    pub async fn dispatch_task(
        &self,
        task: Task,
        owner: &str,
        repo: &str,
        agent_type: &str,
        mode: WorkspaceMode,
        clone_url: &str,
        base_commit: Option<&str>,
    ) -> OrchestratorResult<String> {
        self.dispatch_with_handoff_count(task, owner, repo, agent_type, mode, clone_url, base_commit, 0)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch_with_handoff_count(
        &self,
        task: Task,
        owner: &str,
        repo: &str,
        agent_type: &str,
        mode: WorkspaceMode,
        clone_url: &str,
        base_commit: Option<&str>,
        handoff_count: u8,
    ) -> OrchestratorResult<String> {
        let workspace = self
            .workspaces
            .get_workspace(owner, repo, &task.id, &task.branch, base_commit, mode, clone_url)?;

        OrchestratorTaskInterface::write_task(&workspace.path, &workspace.repo_key(), task.clone())?;

        let worker = self.containers.get_or_create_agent(agent_type, &workspace.path).await?;

        let record = ActiveTask {
            task: task.clone(),
            worker: worker.clone(),
            workspace,
            owner: owner.to_string(),
            repo: repo.to_string(),
            agent_type: agent_type.to_string(),
            clone_url: clone_url.to_string(),
            started_at: chrono::Utc::now(),
            handoff_count,
        };

        info!(task_id = %task.id, agent_type, container_id = %worker.container_id, "task dispatched");
        self.active.lock().insert(task.id.clone(), record);
        Ok(worker.container_id)
    }

    /// Path of the workspace currently bound to `task_id`, if it is active.
    pub fn workspace_path_for(&self, task_id: &str) -> Option<std::path::PathBuf> {
        self.active.lock().get(task_id).map(|record| record.workspace.path.clone())
    }

    /// A copy of the active-task record for `task_id`, if tracked.
    pub fn active_record(&self, task_id: &str) -> Option<ActiveTask> {
        self.active.lock().get(task_id).cloned()
    }

    /// Grants the most recent pending credential request on an active task.
    /// A thin wrapper over the Task Interface operation of the same name,
    /// resolving `task_id` to its bound workspace first.
    pub fn approve_credential_request(&self, task_id: &str) -> OrchestratorResult<()> {
        let workspace_path = self
            .workspace_path_for(task_id)
            .ok_or_else(|| OrchestratorError::TaskNotActive(task_id.to_string()))?;
        OrchestratorTaskInterface::approve_credential_request(&workspace_path, task_id)?;
        Ok(())
    }

    /// Re-dispatches an already-known task, optionally to a different
    /// `agent_type`. Used by the human-driven `/cloud-code retry` and
    /// `/cloud-code handoff` comment commands; unlike the automatic
    /// blocked-handoff path this always resets the handoff-depth counter,
    /// since it is an explicit human decision rather than an automatic retry.
    pub async fn redispatch(&self, task_id: &str, agent_type: Option<&str>) -> OrchestratorResult<String> {
        let record = self
            .active_record(task_id)
            .ok_or_else(|| OrchestratorError::TaskNotActive(task_id.to_string()))?;
        let agent_type = agent_type.unwrap_or(&record.agent_type).to_string();
        self.retire_worker(&record).await;
        self.dispatch_task(
            record.task.clone(),
            &record.owner,
            &record.repo,
            &agent_type,
            record.workspace.mode,
            &record.clone_url,
            None,
        )
        .await
    }

    /// Withdraws a task. Writes a cancel status via the tasking document so
    /// the bound worker skips it on its next selection cycle, then drops it
    /// from the active map and retires its worker. A task already
    /// mid-execution is not preempted — enforcement here is cooperative, by
    /// design.
    pub async fn cancel_task(&self, task_id: &str) -> OrchestratorResult<()> {
        let record = {
            let active = self.active.lock();
            active
                .get(task_id)
                .cloned()
                .ok_or_else(|| OrchestratorError::TaskNotActive(task_id.to_string()))?
        };
        OrchestratorTaskInterface::cancel_task(&record.workspace.path, task_id)?;
        self.active.lock().remove(task_id);
        self.retire_worker(&record).await;
        Ok(())
    }

    /// Stops and removes the worker bound to a retired task record. Runs
    /// best-effort: a removal failure is logged, not propagated, since the
    /// task's own outcome has already been recorded by this point.
    async fn retire_worker(&self, record: &ActiveTask) {
        if let Err(e) = self.containers.remove_agent(&record.worker.container_id).await {
            warn!(
                container_id = %record.worker.container_id,
                error = %e,
                "failed to retire worker after task reached a terminal state"
            );
        }
    }

    /// Runs the supervisor loop until `stop_handle()` is flipped to `false`.
    /// Each iteration reads every active task's report and, for one that has
    /// reached a terminal status, runs the matching hook and drops it from
    /// the active map. A single task's failure never stops the loop — it is
    /// logged and the loop continues with the next task.
    pub async fn start_monitoring(&self, interval: Duration) {
        while self.running.load(Ordering::SeqCst) {
            self.poll_once().await;
            tokio::time::sleep(interval).await;
        }
    }

    /// Runs a single sweep over every active task, without sleeping.
    /// `start_monitoring` is built on top of this; exposed on its own so
    /// tests can drive the loop deterministically.
    pub async fn poll_once(&self) {
        for task_id in self.active_task_ids() {
            if let Err(e) = self.poll_one(&task_id).await {
                error!(task_id = %task_id, error = %e, "error polling active task");
            }
        }
    }

    async fn poll_one(&self, task_id: &str) -> OrchestratorResult<()> {
        let workspace_path = match self.active.lock().get(task_id) {
            Some(record) => record.workspace.path.clone(),
            None => return Ok(()),
        };

        let report = match OrchestratorTaskInterface::get_task_status(&workspace_path, task_id)? {
            Some(report) => report,
            None => return Ok(()),
        };

        match report.status {
            ReportStatus::Completed => {
                if let Some(record) = self.active.lock().remove(task_id) {
                    self.hooks.on_completed(&record, &report).await;
                    self.retire_worker(&record).await;
                }
            }
            ReportStatus::Failed => {
                if let Some(record) = self.active.lock().remove(task_id) {
                    self.hooks.on_failed(&record, &report).await;
                    self.retire_worker(&record).await;
                }
            }
            ReportStatus::Blocked => {
                self.handle_blocked(task_id, &report).await?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_blocked(
        &self,
        task_id: &str,
        report: &cloud_code_core::TaskReport,
    ) -> OrchestratorResult<()> {
        let alternative = report
            .blocked_reason
            .as_deref()
            .and_then(|reason| reason.strip_prefix("recommend_handoff:"));

        let Some(alternative) = alternative else {
            if let Some(record) = self.active.lock().remove(task_id) {
                self.hooks.on_blocked_for_human(&record, report).await;
                self.retire_worker(&record).await;
            }
            return Ok(());
        };

        let record = match self.active.lock().remove(task_id) {
            Some(record) => record,
            None => return Ok(()),
        };

        if record.handoff_count >= MAX_HANDOFFS {
            warn!(task_id, alternative, "handoff limit reached, failing task");
            OrchestratorTaskInterface::cancel_task(&record.workspace.path, task_id).ok();
            let failed_report = cloud_code_core::TaskReport {
                status: ReportStatus::Failed,
                error: Some(format!("handoff limit reached after recommending {alternative}")),
                ..report.clone()
            };
            self.hooks.on_failed(&record, &failed_report).await;
            self.retire_worker(&record).await;
            return Ok(());
        }

        info!(task_id, alternative, "re-dispatching task to alternative tool");
        self.retire_worker(&record).await;
        self.dispatch_with_handoff_count(
            record.task.clone(),
            &record.owner,
            &record.repo,
            alternative,
            record.workspace.mode,
            &record.clone_url,
            None,
            record.handoff_count + 1,
        )
        .await?;
        Ok(())
    }
}
