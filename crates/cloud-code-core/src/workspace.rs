use crate::task::WorkspaceMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the directory, relative to a workspace root, holding the tasking
/// and reporting documents.
pub const METADATA_DIR: &str = ".cloud-code";

/// A provisioned checkout the orchestrator hands to an agent for a single task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    /// Absolute path to the checkout root.
    pub path: PathBuf,
    /// Isolation mode this workspace was provisioned under.
    pub mode: WorkspaceMode,
    /// Repository owner (e.g. GitHub org or user).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch checked out in this workspace.
    pub branch: String,
    /// Task this workspace was provisioned for.
    pub task_id: String,
    /// Whether `.cloud-code/` has been created and the checkout is usable.
    pub ready: bool,
}

impl WorkspaceInfo {
    /// Path to this workspace's `.cloud-code/` metadata directory.
    pub fn metadata_dir(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    /// Path to the tasking document within this workspace.
    pub fn tasking_path(&self) -> PathBuf {
        self.metadata_dir().join("tasking.yaml")
    }

    /// Path to the reporting document within this workspace.
    pub fn reporting_path(&self) -> PathBuf {
        self.metadata_dir().join("reporting.yaml")
    }

    /// Stable identifier for the underlying repository, used as the cache key
    /// for the main checkout (`{owner}-{repo}`).
    pub fn repo_key(&self) -> String {
        format!("{}-{}", self.owner, self.repo)
    }
}

/// Derives the canonical main-checkout directory name for a repository.
pub fn main_checkout_name(owner: &str, repo: &str) -> String {
    format!("{owner}-{repo}")
}

/// Derives the worktree directory for a task under the shared-mode layout.
pub fn worktree_dir(root: &Path, owner: &str, repo: &str, task_id: &str) -> PathBuf {
    root.join(format!("{}.worktrees", main_checkout_name(owner, repo)))
        .join(format!("task-{task_id}"))
}
