use crate::comment_parser::{parse_command, Command};
use crate::error::{GithubError, GithubResult};
use crate::payloads::{IssueCommentEvent, IssuesEvent, PullRequestEvent};
use crate::registry::IssueTaskRegistry;
use crate::task_builder::{build_review_task, build_task_from_issue, infer_agent_type};
use cloud_code_core::WorkspaceMode;
use cloud_code_orchestrator::Orchestrator;
use std::sync::Arc;
use tracing::{info, warn};

const REQUIRED_LABELS: &[&str] = &["cloud-code", "auto-code"];

/// Bridges GitHub webhook events to orchestrator dispatch calls.
///
/// Holds no HTTP concerns of its own — [`crate::webhook`] owns the axum
/// plumbing and hands this the already-verified, already-deserialized event.
pub struct GithubAdapter {
    orchestrator: Arc<Orchestrator>,
    issues: IssueTaskRegistry,
    workspace_mode: WorkspaceMode,
}

impl GithubAdapter {
    /// Builds an adapter over an orchestrator, dispatching every task under
    /// `workspace_mode`.
    pub fn new(orchestrator: Arc<Orchestrator>, workspace_mode: WorkspaceMode) -> Self {
        Self { orchestrator, issues: IssueTaskRegistry::new(), workspace_mode }
    }

    fn clone_url(owner: &str, repo: &str) -> String {
        format!("https://github.com/{owner}/{repo}.git")
    }

    /// Handles an `issues` webhook event.
    pub async fn handle_issues(&self, event: IssuesEvent) -> GithubResult<()> {
        if event.action != "opened" {
            return Ok(());
        }

        let labels: Vec<String> = event.issue.labels.iter().map(|l| l.name.clone()).collect();
        if !labels.iter().any(|l| REQUIRED_LABELS.contains(&l.as_str())) {
            info!(issue = event.issue.number, "issue has no cloud-code label, skipping");
            return Ok(());
        }

        let body = event.issue.body.unwrap_or_default();
        let agent_type = infer_agent_type(&labels, &event.issue.title, &body);
        let task = build_task_from_issue(event.issue.number, &event.issue.title, &body, &labels);
        let task_id = task.id.clone();

        let owner = &event.repository.owner.login;
        let repo = &event.repository.name;
        let clone_url = Self::clone_url(owner, repo);

        self.orchestrator
            .dispatch_task(task, owner, repo, &agent_type, self.workspace_mode, &clone_url, None)
            .await?;
        self.issues.bind(event.issue.number, task_id);
        Ok(())
    }

    /// Handles an `issue_comment` webhook event.
    pub async fn handle_issue_comment(&self, event: IssueCommentEvent) -> GithubResult<()> {
        if event.action != "created" {
            return Ok(());
        }

        let Some(command) = parse_command(&event.comment.body) else {
            return Ok(());
        };
        info!(author = %event.comment.user.login, ?command, "cloud-code command received");

        let issue_number = event.issue.number;
        let owner = event.repository.owner.login.clone();
        let repo = event.repository.name.clone();

        match command {
            Command::Run { agent_type } => {
                let labels: Vec<String> = event.issue.labels.iter().map(|l| l.name.clone()).collect();
                let body = event.issue.body.unwrap_or_default();
                let agent_type =
                    agent_type.unwrap_or_else(|| infer_agent_type(&labels, &event.issue.title, &body));
                let task = build_task_from_issue(issue_number, &event.issue.title, &body, &labels);
                let task_id = task.id.clone();
                let clone_url = Self::clone_url(&owner, &repo);
                self.orchestrator
                    .dispatch_task(task, &owner, &repo, &agent_type, self.workspace_mode, &clone_url, None)
                    .await?;
                self.issues.bind(issue_number, task_id);
            }
            Command::Cancel => {
                let task_id = self.task_for(issue_number)?;
                self.orchestrator.cancel_task(&task_id).await?;
                self.issues.unbind(issue_number);
            }
            Command::Status => {
                let task_id = self.task_for(issue_number)?;
                if let Some(path) = self.orchestrator.workspace_path_for(&task_id) {
                    let status = cloud_code_task::OrchestratorTaskInterface::get_task_status(&path, &task_id)?;
                    info!(task_id, status = ?status.map(|r| r.status), "status requested");
                }
            }
            Command::Handoff { target_agent } => {
                let task_id = self.task_for(issue_number)?;
                let new_id = self
                    .orchestrator
                    .redispatch(&task_id, target_agent.as_deref())
                    .await?;
                info!(task_id, new_id, "manual handoff dispatched");
            }
            Command::Retry => {
                let task_id = self.task_for(issue_number)?;
                self.orchestrator.redispatch(&task_id, None).await?;
            }
            Command::Approve => {
                let task_id = self.task_for(issue_number)?;
                self.orchestrator.approve_credential_request(&task_id)?;
            }
            Command::Reject { reason } => {
                let task_id = self.task_for(issue_number)?;
                warn!(task_id, reason = ?reason, "changes rejected via comment command");
                self.orchestrator.cancel_task(&task_id).await?;
                self.issues.unbind(issue_number);
            }
            Command::Config { key, value } => {
                info!(issue_number, key, value = ?value, "config command acknowledged, no-op");
            }
        }
        Ok(())
    }

    /// Handles a `pull_request` webhook event.
    pub async fn handle_pull_request(&self, event: PullRequestEvent) -> GithubResult<()> {
        if !matches!(event.action.as_str(), "opened" | "synchronize" | "reopened") {
            return Ok(());
        }
        if event.pull_request.user.login.to_lowercase().contains("cloud-code") {
            return Ok(());
        }

        let body = event.pull_request.body.unwrap_or_default();
        let task = build_review_task(
            event.pull_request.number,
            &event.pull_request.title,
            &body,
            &event.pull_request.head.ref_name,
        );
        let owner = &event.repository.owner.login;
        let repo = &event.repository.name;
        let clone_url = Self::clone_url(owner, repo);

        self.orchestrator
            .dispatch_task(task, owner, repo, "reviewer", self.workspace_mode, &clone_url, None)
            .await?;
        Ok(())
    }

    fn task_for(&self, issue_number: u64) -> GithubResult<String> {
        self.issues
            .task_for_issue(issue_number)
            .ok_or(GithubError::NoActiveTaskForIssue(issue_number))
    }
}
