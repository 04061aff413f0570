use crate::error::AgentLoopResult;
use crate::prompt::build_prompt;
use crate::selection::select_next_task;
use crate::summary::extract_summary;
use crate::vcs::{collect_changed_files, commit_task};
use cloud_code_core::{ReportStatus, Task};
use cloud_code_task::{AgentTaskInterface, OrchestratorTaskInterface};
use cloud_code_tools::{CodingTool, ToolRegistry};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// The loop running inside one worker container: reads tasks dispatched into
/// its bound workspace, picks the next eligible one, runs it through a
/// coding-tool adapter, and reports the outcome back — see the module-level
/// docs for the full procedure.
pub struct AgentLoop {
    workspace_path: PathBuf,
    agent_type: String,
    agent_id: String,
    tool: Arc<dyn CodingTool>,
    registry: Arc<ToolRegistry>,
    idle_poll_interval_ms: AtomicU64,
    agent_timeout_ms: AtomicU64,
    running: Arc<AtomicBool>,
}

impl AgentLoop {
    /// Builds a loop bound to `workspace_path`, driving `tool` as its primary
    /// coding tool. `registry` is consulted only to suggest a handoff target.
    pub fn new(
        workspace_path: PathBuf,
        agent_type: impl Into<String>,
        agent_id: impl Into<String>,
        tool: Arc<dyn CodingTool>,
        registry: Arc<ToolRegistry>,
        idle_poll_interval: Duration,
        agent_timeout: Duration,
    ) -> Self {
        Self {
            workspace_path,
            agent_type: agent_type.into(),
            agent_id: agent_id.into(),
            tool,
            registry,
            idle_poll_interval_ms: AtomicU64::new(idle_poll_interval.as_millis() as u64),
            agent_timeout_ms: AtomicU64::new(agent_timeout.as_millis() as u64),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns a handle that a signal handler can flip to stop the loop at
    /// its next idle check.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Updates the idle poll interval in place, picked up on the loop's next
    /// idle check. Lets a config hot-reload take effect without restarting
    /// the loop.
    pub fn set_idle_poll_interval(&self, interval: Duration) {
        self.idle_poll_interval_ms.store(interval.as_millis() as u64, Ordering::SeqCst);
    }

    /// Updates the per-invocation coding-tool timeout in place, picked up by
    /// the next task execution.
    pub fn set_agent_timeout(&self, timeout: Duration) {
        self.agent_timeout_ms.store(timeout.as_millis() as u64, Ordering::SeqCst);
    }

    fn idle_poll_interval(&self) -> Duration {
        Duration::from_millis(self.idle_poll_interval_ms.load(Ordering::SeqCst))
    }

    fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms.load(Ordering::SeqCst))
    }

    /// Runs until `stop_handle()` is flipped to `false`. Never returns an
    /// error from a single task's failure — those are caught and reported
    /// through the task's own report instead.
    pub async fn run(&self) -> AgentLoopResult<()> {
        AgentTaskInterface::initialize_agent(&self.workspace_path, &self.agent_type, &self.agent_id)?;

        while self.running.load(Ordering::SeqCst) {
            let tasks = AgentTaskInterface::get_pending_tasks(&self.workspace_path)?;
            let reporting = OrchestratorTaskInterface::read_report(&self.workspace_path)?;

            match select_next_task(&tasks, &reporting) {
                Some(task) => self.execute_task(&task).await,
                None => tokio::time::sleep(self.idle_poll_interval()).await,
            }
        }

        Ok(())
    }

    async fn execute_task(&self, task: &Task) {
        if let Err(e) = self.execute_task_inner(task).await {
            error!(task_id = %task.id, error = %e, "task execution failed unexpectedly");
            let _ = AgentTaskInterface::set_task_failed(&self.workspace_path, &task.id, e.to_string());
        }
    }

    async fn execute_task_inner(&self, task: &Task) -> AgentLoopResult<()> {
        AgentTaskInterface::update_status(
            &self.workspace_path,
            &task.id,
            ReportStatus::Received,
            "received task",
            HashMap::new(),
        )?;
        AgentTaskInterface::update_status(
            &self.workspace_path,
            &task.id,
            ReportStatus::Planning,
            "building prompt",
            HashMap::new(),
        )?;

        let prompt = build_prompt(task);

        AgentTaskInterface::update_status(
            &self.workspace_path,
            &task.id,
            ReportStatus::InProgress,
            format!("invoking {}", self.tool.name()),
            HashMap::new(),
        )?;

        let outcome = self
            .tool
            .execute(&prompt, &self.workspace_path, self.agent_timeout())
            .await?;

        if !outcome.success {
            if outcome.needs_handoff {
                let alternative = self.registry.suggest_alternative(self.tool.name()).await;
                warn!(task_id = %task.id, alternative, "tool requested a handoff");
                AgentTaskInterface::set_task_blocked(
                    &self.workspace_path,
                    &task.id,
                    format!("recommend_handoff:{alternative}"),
                )?;
            } else {
                AgentTaskInterface::set_task_failed(
                    &self.workspace_path,
                    &task.id,
                    outcome.error.unwrap_or_else(|| "coding tool reported failure".to_string()),
                )?;
            }
            return Ok(());
        }

        let repo = git2::Repository::open(&self.workspace_path)?;
        let files = collect_changed_files(&repo)?;
        let commit = commit_task(&repo, task)?;
        let summary = extract_summary(&outcome.output);
        let changes_summary = format!("{} file(s) changed", files.len());

        info!(task_id = %task.id, sha = %commit.sha, "task completed");
        AgentTaskInterface::set_task_completed(
            &self.workspace_path,
            &task.id,
            summary,
            changes_summary,
            files,
            vec![commit],
        )?;

        Ok(())
    }
}
