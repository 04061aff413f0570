use crate::github_client::{GithubClient, NewPullRequest};
use async_trait::async_trait;
use cloud_code_core::TaskReport;
use cloud_code_orchestrator::{ActiveTask, OrchestratorHooks};
use std::sync::Arc;
use tracing::{error, info, warn};

/// [`OrchestratorHooks`] implementation that turns terminal task reports into
/// GitHub side effects: opening a pull request on success, and posting a
/// comment on failure or when a human needs to step in.
pub struct GithubHooks {
    client: Arc<dyn GithubClient>,
    base_branch: String,
}

impl GithubHooks {
    /// Builds hooks that open pull requests and post comments through
    /// `client`, basing every pull request against `base_branch` (typically
    /// `"main"`).
    pub fn new(client: Arc<dyn GithubClient>, base_branch: impl Into<String>) -> Self {
        Self { client, base_branch: base_branch.into() }
    }
}

#[async_trait]
impl OrchestratorHooks for GithubHooks {
    async fn on_completed(&self, active: &ActiveTask, report: &TaskReport) {
        let summary = report
            .changes_summary
            .clone()
            .or_else(|| report.summary.clone())
            .unwrap_or_else(|| "Task completed.".to_string());

        let body = format!(
            "## Summary\n{summary}\n\n## Commits\n{}\n",
            report
                .commits
                .iter()
                .map(|c| format!("- `{}` {}", c.sha, c.message))
                .collect::<Vec<_>>()
                .join("\n")
        );

        let request = NewPullRequest {
            title: &active.task.title,
            head: &active.task.branch,
            base: &self.base_branch,
            body: &body,
        };

        match self.client.create_pull_request(&active.owner, &active.repo, request).await {
            Ok(number) => info!(task_id = %active.task.id, pr_number = number, "pull request opened"),
            Err(e) => error!(task_id = %active.task.id, error = %e, "failed to open pull request"),
        }
    }

    async fn on_failed(&self, active: &ActiveTask, report: &TaskReport) {
        let reason = report.error.clone().unwrap_or_else(|| "unknown error".to_string());
        let body = format!("Task `{}` failed: {reason}", active.task.id);
        self.comment_on_issue(active, &body).await;
    }

    async fn on_blocked_for_human(&self, active: &ActiveTask, report: &TaskReport) {
        let reason = report.blocked_reason.clone().unwrap_or_else(|| "needs input".to_string());
        let body = format!(
            "Task `{}` is blocked and needs human input: {reason}\n\nReply with `/cloud-code approve`, `/cloud-code retry`, or `/cloud-code cancel`.",
            active.task.id
        );
        warn!(task_id = %active.task.id, reason, "task blocked for human input");
        self.comment_on_issue(active, &body).await;
    }
}

impl GithubHooks {
    /// Posts `body` back to the issue the task's branch was derived from.
    /// Silently skipped for tasks (like PR reviews) whose branch carries no
    /// recoverable issue number, rather than guessing a wrong target.
    async fn comment_on_issue(&self, active: &ActiveTask, body: &str) {
        let Some(issue_number) = crate::task_builder::issue_number_from_branch(&active.task.branch) else {
            warn!(task_id = %active.task.id, branch = %active.task.branch, "no issue to comment on");
            return;
        };
        if let Err(e) = self.client.post_comment(&active.owner, &active.repo, issue_number, body).await {
            error!(task_id = %active.task.id, error = %e, "failed to post comment");
        }
    }
}
