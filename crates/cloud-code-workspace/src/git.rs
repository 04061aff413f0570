use crate::error::WorkspaceResult;
use git2::{build::CheckoutBuilder, Oid, Repository, WorktreeAddOptions};
use std::path::Path;

/// Clones `clone_url` into `path` if it does not exist yet, otherwise fetches
/// all remotes with pruning. Returns the opened repository either way.
pub fn ensure_main_checkout(path: &Path, clone_url: &str) -> WorkspaceResult<Repository> {
    if path.exists() {
        let repo = Repository::open(path)?;
        fetch_all(&repo)?;
        Ok(repo)
    } else {
        tracing::info!(path = %path.display(), url = %clone_url, "cloning main checkout");
        Ok(Repository::clone(clone_url, path)?)
    }
}

/// Fetches every configured remote with `--prune` semantics.
pub fn fetch_all(repo: &Repository) -> WorkspaceResult<()> {
    let remotes = repo.remotes()?;
    for name in remotes.iter().flatten() {
        let mut remote = repo.find_remote(name)?;
        let mut opts = git2::FetchOptions::new();
        opts.prune(git2::FetchPrune::On);
        remote.fetch::<&str>(&[], Some(&mut opts), None)?;
    }
    Ok(())
}

/// Resolves `base_commit` (a sha or ref, if given) or the repository's HEAD
/// to a commit object.
pub fn resolve_base_commit<'repo>(
    repo: &'repo Repository,
    base_commit: Option<&str>,
) -> WorkspaceResult<git2::Commit<'repo>> {
    let oid = match base_commit {
        Some(spec) => repo.revparse_single(spec)?.peel_to_commit()?.id(),
        None => repo.head()?.peel_to_commit()?.id(),
    };
    Ok(repo.find_commit(oid)?)
}

/// Adds a task-private worktree at `worktree_path`, creating `branch` from
/// `base_commit` (or HEAD if absent).
pub fn add_worktree(
    repo: &Repository,
    worktree_name: &str,
    worktree_path: &Path,
    branch: &str,
    base_commit: Option<&str>,
) -> WorkspaceResult<()> {
    let commit = resolve_base_commit(repo, base_commit)?;
    let branch_ref = repo.branch(branch, &commit, false).map(|b| b.into_reference())
        .or_else(|_| repo.find_branch(branch, git2::BranchType::Local).map(|b| b.into_reference()))?;

    let mut opts = WorktreeAddOptions::new();
    opts.reference(Some(&branch_ref));
    repo.worktree(worktree_name, worktree_path, Some(&opts))?;
    Ok(())
}

/// Removes a worktree's administrative files so the main repo no longer
/// tracks it. The caller is responsible for removing the directory itself.
pub fn prune_worktree(repo: &Repository, worktree_name: &str) -> WorkspaceResult<()> {
    if let Ok(worktree) = repo.find_worktree(worktree_name) {
        let mut opts = git2::WorktreePruneOptions::new();
        opts.valid(true).working_tree(true);
        worktree.prune(Some(&mut opts))?;
    }
    Ok(())
}

/// Clones `clone_url` fresh into `path`, replacing any existing directory,
/// then checks out `branch` created from `base_commit` (or HEAD).
pub fn clone_isolated(
    path: &Path,
    clone_url: &str,
    branch: &str,
    base_commit: Option<&str>,
) -> WorkspaceResult<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    let repo = Repository::clone(clone_url, path)?;
    checkout_new_branch(&repo, branch, base_commit)?;
    Ok(())
}

/// Creates (or resets) `branch` from `base_commit`/HEAD and checks it out,
/// mirroring `git checkout -B branch`.
pub fn checkout_new_branch(
    repo: &Repository,
    branch: &str,
    base_commit: Option<&str>,
) -> WorkspaceResult<()> {
    let commit = resolve_base_commit(repo, base_commit)?;
    let _ = repo.branch(branch, &commit, true)?;
    let reference = format!("refs/heads/{branch}");
    repo.set_head(&reference)?;
    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout))?;
    Ok(())
}

/// Recursively copies `src` to `dst`, used for copy-on-write workspaces.
pub fn copy_tree(src: &Path, dst: &Path) -> WorkspaceResult<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let dst_path = dst.join(entry.file_name());
        if file_type.is_dir() {
            copy_tree(&entry.path(), &dst_path)?;
        } else if file_type.is_symlink() {
            // Best effort: skip symlinks rather than risk escaping `src`.
            continue;
        } else {
            std::fs::copy(entry.path(), &dst_path)?;
        }
    }
    Ok(())
}

/// Shorthand for a commit's full 40-character hex id.
pub fn commit_sha(oid: Oid) -> String {
    oid.to_string()
}
