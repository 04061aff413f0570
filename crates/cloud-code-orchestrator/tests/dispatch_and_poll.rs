//! Integration tests for the dispatch pipeline and supervisor polling loop,
//! driven against fake workers so no Docker daemon is required.

use async_trait::async_trait;
use cloud_code_containers::{ContainerResult, WorkerProvisioner};
use cloud_code_core::{Priority, ReportStatus, Task, Worker, WorkspaceMode};
use cloud_code_orchestrator::{ActiveTask, NoopHooks, Orchestrator, OrchestratorHooks};
use cloud_code_task::AgentTaskInterface;
use cloud_code_workspace::WorkspaceManager;
use git2::{Repository, Signature};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

struct FakeWorkerProvisioner {
    calls: AtomicUsize,
}

#[async_trait]
impl WorkerProvisioner for FakeWorkerProvisioner {
    async fn get_or_create_agent(&self, agent_type: &str, workspace: &Path) -> ContainerResult<Worker> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut worker = Worker::new(
            format!("fake-{}", self.calls.load(Ordering::SeqCst)),
            "fake",
            agent_type,
            "claude-code",
        );
        worker.bind(workspace.to_path_buf());
        Ok(worker)
    }

    async fn remove_agent(&self, _container_id: &str) -> ContainerResult<()> {
        Ok(())
    }
}

struct RecordingHooks {
    completed: Mutex<Vec<String>>,
    failed: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn new() -> Self {
        Self { completed: Mutex::new(Vec::new()), failed: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl OrchestratorHooks for RecordingHooks {
    async fn on_completed(&self, active: &ActiveTask, _report: &cloud_code_core::TaskReport) {
        self.completed.lock().unwrap().push(active.task.id.clone());
    }
    async fn on_failed(&self, active: &ActiveTask, _report: &cloud_code_core::TaskReport) {
        self.failed.lock().unwrap().push(active.task.id.clone());
    }
    async fn on_blocked_for_human(&self, _active: &ActiveTask, _report: &cloud_code_core::TaskReport) {}
}

fn bare_repo(path: &Path) {
    std::fs::create_dir_all(path).unwrap();
    let repo = Repository::init(path).unwrap();
    std::fs::write(path.join("README.md"), "hello\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    let sig = Signature::now("test", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).unwrap();
}

#[tokio::test]
async fn dispatch_registers_an_active_task_and_writes_it_to_the_workspace() {
    let root = tempdir().unwrap();
    let clone_source = tempdir().unwrap();
    bare_repo(clone_source.path());

    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let orchestrator = Orchestrator::new(workspaces, containers, Arc::new(NoopHooks));

    let task = Task::new("t1", "Add health check", "cloud-code/issue-1").with_priority(Priority::High);
    let clone_url = clone_source.path().to_str().unwrap().to_string();

    let worker_id = orchestrator
        .dispatch_task(task, "acme", "widgets", "backend", WorkspaceMode::Isolated, &clone_url, None)
        .await
        .unwrap();

    assert_eq!(worker_id, "fake-1");
    assert_eq!(orchestrator.active_task_ids(), vec!["t1".to_string()]);
}

#[tokio::test]
async fn polling_loop_drains_a_completed_task_into_the_completed_hook() {
    let root = tempdir().unwrap();
    let clone_source = tempdir().unwrap();
    bare_repo(clone_source.path());

    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let hooks = Arc::new(RecordingHooks::new());
    let orchestrator = Orchestrator::new(workspaces, containers, hooks.clone());

    let task = Task::new("t1", "Add health check", "cloud-code/issue-1");
    let clone_url = clone_source.path().to_str().unwrap().to_string();
    orchestrator
        .dispatch_task(task, "acme", "widgets", "backend", WorkspaceMode::Isolated, &clone_url, None)
        .await
        .unwrap();

    let workspace_path = root.path().join("workspaces").join("task-t1");
    AgentTaskInterface::set_task_completed(
        &workspace_path,
        "t1",
        "done",
        "1 file changed",
        Vec::new(),
        Vec::new(),
    )
    .unwrap();

    let stop = orchestrator.stop_handle();
    let orchestrator = Arc::new(orchestrator);
    let loop_handle = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.start_monitoring(Duration::from_millis(10)).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    stop.store(false, Ordering::SeqCst);
    loop_handle.await.unwrap();

    assert!(orchestrator.active_task_ids().is_empty());
    assert_eq!(hooks.completed.lock().unwrap().as_slice(), ["t1"]);
    assert!(hooks.failed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancel_withdraws_the_task_without_touching_its_report() {
    let root = tempdir().unwrap();
    let clone_source = tempdir().unwrap();
    bare_repo(clone_source.path());

    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let orchestrator = Orchestrator::new(workspaces, containers, Arc::new(NoopHooks));

    let task = Task::new("t1", "Add health check", "cloud-code/issue-1");
    let clone_url = clone_source.path().to_str().unwrap().to_string();
    orchestrator
        .dispatch_task(task, "acme", "widgets", "backend", WorkspaceMode::Isolated, &clone_url, None)
        .await
        .unwrap();

    orchestrator.cancel_task("t1").await.unwrap();
    assert!(orchestrator.active_task_ids().is_empty());

    let workspace_path = root.path().join("workspaces").join("task-t1");
    let report = cloud_code_task::OrchestratorTaskInterface::get_task_status(&workspace_path, "t1").unwrap();
    assert!(report.is_none() || report.unwrap().status == ReportStatus::Waiting);

    let tasks = cloud_code_task::OrchestratorTaskInterface::read_report(&workspace_path).unwrap();
    assert!(tasks.tasks.is_empty());
}

#[tokio::test]
async fn second_handoff_on_the_same_task_is_terminal_failure() {
    let root = tempdir().unwrap();
    let clone_source = tempdir().unwrap();
    bare_repo(clone_source.path());

    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let hooks = Arc::new(RecordingHooks::new());
    let orchestrator = Arc::new(Orchestrator::new(workspaces, containers, hooks.clone()));

    let task = Task::new("t1", "Add health check", "cloud-code/issue-1");
    let clone_url = clone_source.path().to_str().unwrap().to_string();
    orchestrator
        .dispatch_task(task, "acme", "widgets", "backend", WorkspaceMode::Isolated, &clone_url, None)
        .await
        .unwrap();

    let workspace_path = root.path().join("workspaces").join("task-t1");
    AgentTaskInterface::set_task_blocked(&workspace_path, "t1", "recommend_handoff:aider").unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let report = cloud_code_task::OrchestratorTaskInterface::get_task_status(&workspace_path, "t1")
        .unwrap()
        .unwrap();
    assert_eq!(report.status, ReportStatus::Blocked);

    orchestrator.poll_once().await;

    // After the first handoff the task is active again under the
    // alternative tool; a freshly (re)initialized agent writes a new report
    // and blocks a second time, which must hit the bound.
    AgentTaskInterface::initialize_agent(&workspace_path, "aider", "agent-2").unwrap();
    AgentTaskInterface::set_task_blocked(&workspace_path, "t1", "recommend_handoff:codex").unwrap();
    orchestrator.poll_once().await;

    assert!(orchestrator.active_task_ids().is_empty());
    assert_eq!(hooks.failed.lock().unwrap().as_slice(), ["t1"]);
}
