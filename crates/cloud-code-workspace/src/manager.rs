use crate::error::WorkspaceResult;
use crate::git;
use cloud_code_core::{main_checkout_name, worktree_dir, WorkspaceInfo, WorkspaceMode, METADATA_DIR};
use std::path::{Path, PathBuf};

/// Provisions and reclaims workspaces across the three isolation modes.
///
/// All workspaces for every `(owner, repo)` live under one `root` directory;
/// the shared mode additionally caches one bare-ish main checkout per repo so
/// every task-private worktree shares the same object store.
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    /// Builds a manager rooted at `root`, creating the directory if absent.
    pub fn new(root: impl Into<PathBuf>) -> WorkspaceResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn main_checkout_path(&self, owner: &str, repo: &str) -> PathBuf {
        self.root.join(main_checkout_name(owner, repo))
    }

    /// Provisions (or returns the existing) workspace for `task_id`.
    ///
    /// Idempotent: a second call with the same `task_id` returns the same
    /// path without re-cloning or re-copying.
    #[allow(clippy::too_many_arguments)]
    pub fn get_workspace(
        &self,
        owner: &str,
        repo: &str,
        task_id: &str,
        branch: &str,
        base_commit: Option<&str>,
        mode: WorkspaceMode,
        clone_url: &str,
    ) -> WorkspaceResult<WorkspaceInfo> {
        let path = match mode {
            WorkspaceMode::Shared => {
                worktree_dir(&self.root, owner, repo, task_id)
            }
            WorkspaceMode::Isolated | WorkspaceMode::CopyOnWrite => {
                self.root.join(format!("task-{task_id}"))
            }
        };

        if !path.exists() {
            match mode {
                WorkspaceMode::Shared => {
                    let main_path = self.main_checkout_path(owner, repo);
                    let main_repo = git::ensure_main_checkout(&main_path, clone_url)?;
                    git::add_worktree(&main_repo, &format!("task-{task_id}"), &path, branch, base_commit)?;
                }
                WorkspaceMode::Isolated => {
                    git::clone_isolated(&path, clone_url, branch, base_commit)?;
                }
                WorkspaceMode::CopyOnWrite => {
                    let main_path = self.main_checkout_path(owner, repo);
                    git::ensure_main_checkout(&main_path, clone_url)?;
                    git::copy_tree(&main_path, &path)?;
                    let repo = git2::Repository::open(&path)?;
                    git::checkout_new_branch(&repo, branch, base_commit)?;
                }
            }
        }

        self.ensure_metadata_dir(&path)?;

        Ok(WorkspaceInfo {
            path,
            mode,
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            task_id: task_id.to_string(),
            ready: true,
        })
    }

    fn ensure_metadata_dir(&self, workspace_path: &Path) -> WorkspaceResult<()> {
        std::fs::create_dir_all(workspace_path.join(METADATA_DIR))?;
        Ok(())
    }

    /// Reclaims a workspace. Shared-mode worktrees are pruned from the main
    /// repo's bookkeeping before the directory is removed; other modes are a
    /// plain recursive remove. Best-effort: leftover directories from a prior
    /// failed attempt are tolerated and cleaned up on the next call.
    pub fn cleanup_workspace(&self, info: &WorkspaceInfo) -> WorkspaceResult<()> {
        if info.mode == WorkspaceMode::Shared {
            let main_path = self.main_checkout_path(&info.owner, &info.repo);
            if let Ok(main_repo) = git2::Repository::open(&main_path) {
                let _ = git::prune_worktree(&main_repo, &format!("task-{}", info.task_id));
            }
        }
        if info.path.exists() {
            std::fs::remove_dir_all(&info.path)?;
        }
        Ok(())
    }
}
