//! End-to-end test of the webhook layer: a raw `issues` payload dispatches a
//! task, and a follow-up `/cloud-code cancel` comment withdraws it, all
//! through the axum router.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{Request, StatusCode};
use cloud_code_containers::{ContainerResult, WorkerProvisioner};
use cloud_code_core::Worker;
use cloud_code_github::events::GithubAdapter;
use cloud_code_github::webhook::{self, WebhookConfig};
use cloud_code_orchestrator::{NoopHooks, Orchestrator};
use cloud_code_workspace::WorkspaceManager;
use git2::{Repository, Signature};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;
use tower::util::ServiceExt;

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

fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

async fn post(app: axum::Router, event: &str, body: Bytes, secret: &str) -> (StatusCode, Bytes) {
    let signature = sign(secret, &body);
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/github")
        .header("X-GitHub-Event", event)
        .header("X-Hub-Signature-256", signature)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

#[tokio::test]
async fn issue_opened_dispatches_then_comment_cancels_it() {
    let root = tempdir().unwrap();
    let clone_source = tempdir().unwrap();
    bare_repo(clone_source.path());
    let clone_url = clone_source.path().to_str().unwrap().to_string();

    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let orchestrator = Arc::new(Orchestrator::new(workspaces, containers, Arc::new(NoopHooks)));
    let adapter = Arc::new(GithubAdapter::new(orchestrator.clone(), cloud_code_core::WorkspaceMode::Isolated));
    let config = WebhookConfig { secret: Some("s3cr3t".to_string()) };
    let app = webhook::router(adapter, config);

    let issue_payload = serde_json::json!({
        "action": "opened",
        "issue": {
            "number": 42,
            "title": "Add retry logic",
            "body": "## Acceptance Criteria\n- Retries three times",
            "labels": [{"name": "cloud-code"}, {"name": "backend"}]
        },
        "repository": {
            "name": "widgets",
            "owner": {"login": "acme"}
        }
    });
    let body = Bytes::from(serde_json::to_vec(&issue_payload).unwrap());
    let (status, resp) = post(app.clone(), "issues", body, "s3cr3t").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&resp).unwrap()["status"], "ok");
    assert_eq!(orchestrator.active_task_ids().len(), 1);

    let comment_payload = serde_json::json!({
        "action": "created",
        "issue": {
            "number": 42,
            "title": "Add retry logic",
            "body": null,
            "labels": []
        },
        "comment": {
            "body": "/cloud-code cancel",
            "user": {"login": "reviewer"}
        },
        "repository": {
            "name": "widgets",
            "owner": {"login": "acme"}
        }
    });
    let body = Bytes::from(serde_json::to_vec(&comment_payload).unwrap());
    let (status, _resp) = post(app, "issue_comment", body, "s3cr3t").await;
    assert_eq!(status, StatusCode::OK);
    assert!(orchestrator.active_task_ids().is_empty());
}

#[tokio::test]
async fn bad_signature_is_rejected() {
    let root = tempdir().unwrap();
    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let orchestrator = Arc::new(Orchestrator::new(workspaces, containers, Arc::new(NoopHooks)));
    let adapter = Arc::new(GithubAdapter::new(orchestrator, cloud_code_core::WorkspaceMode::Isolated));
    let config = WebhookConfig { secret: Some("s3cr3t".to_string()) };
    let app = webhook::router(adapter, config);

    let body = Bytes::from_static(b"{}");
    let (status, _resp) = post(app, "ping", body, "wrong-secret").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unrecognized_event_kind_is_acknowledged() {
    let root = tempdir().unwrap();
    let workspaces = WorkspaceManager::new(root.path().join("workspaces")).unwrap();
    let containers = Arc::new(FakeWorkerProvisioner { calls: AtomicUsize::new(0) });
    let orchestrator = Arc::new(Orchestrator::new(workspaces, containers, Arc::new(NoopHooks)));
    let adapter = Arc::new(GithubAdapter::new(orchestrator, cloud_code_core::WorkspaceMode::Isolated));
    let config = WebhookConfig { secret: Some("s3cr3t".to_string()) };
    let app = webhook::router(adapter, config);

    let body = Bytes::from_static(b"{}");
    let (status, _resp) = post(app, "deployment_status", body, "s3cr3t").await;
    assert_eq!(status, StatusCode::OK);
}
