//! Integration tests for workspace provisioning across the three isolation modes.

use cloud_code_core::WorkspaceMode;
use cloud_code_workspace::WorkspaceManager;
use std::path::Path;
use tempfile::tempdir;

/// Builds a throwaway git repository with one commit on `main` and returns
/// its path, suitable for use as a `clone_url` (a local filesystem path is a
/// valid git2 clone source).
fn init_source_repo(dir: &Path) -> String {
    let repo = git2::Repository::init(dir).unwrap();
    std::fs::write(dir.join("README.md"), b"hello\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
        .unwrap();

    // Ensure the default branch is named `main` regardless of git2's default.
    let head = repo.head().unwrap();
    if head.name() != Some("refs/heads/main") {
        let commit = head.peel_to_commit().unwrap();
        repo.branch("main", &commit, true).unwrap();
        repo.set_head("refs/heads/main").unwrap();
    }

    dir.display().to_string()
}

#[test]
fn shared_mode_provisions_a_worktree_and_is_idempotent() {
    let source = tempdir().unwrap();
    let clone_url = init_source_repo(source.path());

    let root = tempdir().unwrap();
    let manager = WorkspaceManager::new(root.path()).unwrap();

    let first = manager
        .get_workspace(
            "acme",
            "widgets",
            "task-1",
            "cloud-code/task-1",
            None,
            WorkspaceMode::Shared,
            &clone_url,
        )
        .unwrap();
    assert!(first.ready);
    assert!(first.path.join("README.md").exists());
    assert!(first.metadata_dir().exists());

    let second = manager
        .get_workspace(
            "acme",
            "widgets",
            "task-1",
            "cloud-code/task-1",
            None,
            WorkspaceMode::Shared,
            &clone_url,
        )
        .unwrap();
    assert_eq!(first.path, second.path);
}

#[test]
fn isolated_mode_gives_each_task_its_own_clone() {
    let source = tempdir().unwrap();
    let clone_url = init_source_repo(source.path());

    let root = tempdir().unwrap();
    let manager = WorkspaceManager::new(root.path()).unwrap();

    let a = manager
        .get_workspace(
            "acme", "widgets", "task-a", "cloud-code/task-a", None,
            WorkspaceMode::Isolated, &clone_url,
        )
        .unwrap();
    let b = manager
        .get_workspace(
            "acme", "widgets", "task-b", "cloud-code/task-b", None,
            WorkspaceMode::Isolated, &clone_url,
        )
        .unwrap();

    assert_ne!(a.path, b.path);
    assert!(a.path.join(".git").exists());
    assert!(b.path.join(".git").exists());
}

#[test]
fn copy_on_write_mode_copies_the_cached_main_checkout() {
    let source = tempdir().unwrap();
    let clone_url = init_source_repo(source.path());

    let root = tempdir().unwrap();
    let manager = WorkspaceManager::new(root.path()).unwrap();

    let ws = manager
        .get_workspace(
            "acme", "widgets", "task-cow", "cloud-code/task-cow", None,
            WorkspaceMode::CopyOnWrite, &clone_url,
        )
        .unwrap();

    assert!(ws.path.join("README.md").exists());
    // The cache directory for the main checkout must also exist, independent
    // of the per-task copy.
    assert!(root.path().join("acme-widgets").exists());
}

#[test]
fn cleanup_removes_the_task_private_checkout() {
    let source = tempdir().unwrap();
    let clone_url = init_source_repo(source.path());

    let root = tempdir().unwrap();
    let manager = WorkspaceManager::new(root.path()).unwrap();

    let ws = manager
        .get_workspace(
            "acme", "widgets", "task-z", "cloud-code/task-z", None,
            WorkspaceMode::Shared, &clone_url,
        )
        .unwrap();
    assert!(ws.path.exists());

    manager.cleanup_workspace(&ws).unwrap();
    assert!(!ws.path.exists());
}
