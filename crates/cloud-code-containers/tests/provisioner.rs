//! Integration tests against a real Docker daemon. These are marked
//! `#[ignore]` since CI and most developer machines do not have one
//! available; run with `cargo test -- --ignored` on a box that does.

use cloud_code_containers::ContainerProvisioner;
use cloud_code_secrets::EnvSecretStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn provisioner() -> ContainerProvisioner {
    ContainerProvisioner::new("bridge", Arc::new(EnvSecretStore::new()))
        .expect("docker daemon reachable")
}

#[tokio::test]
#[ignore]
async fn provisioning_an_unknown_agent_type_fails_fast() {
    let provisioner = provisioner();
    let result = provisioner
        .provision_agent("not-a-real-role", None, None, None)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore]
async fn get_or_create_reuses_an_idle_worker_bound_to_the_same_workspace() {
    let provisioner = provisioner();
    let workspace = tempdir().unwrap();

    let first = provisioner
        .get_or_create_agent("backend", workspace.path())
        .await
        .unwrap();
    provisioner.execute_in_agent(&first, vec!["true".to_string()], "/workspace", Duration::from_secs(5))
        .await
        .unwrap();

    let second = provisioner
        .get_or_create_agent("backend", workspace.path())
        .await
        .unwrap();

    assert_eq!(first.container_id, second.container_id);
    provisioner.cleanup_all().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn exec_reports_nonzero_exit_without_erroring() {
    let provisioner = provisioner();
    let workspace = tempdir().unwrap();
    let worker = provisioner
        .get_or_create_agent("backend", workspace.path())
        .await
        .unwrap();

    let (exit_code, _stdout, _stderr) = provisioner
        .execute_in_agent(&worker, vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()], "/workspace", Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(exit_code, 3);
    provisioner.cleanup_all().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn health_check_is_false_after_remove_agent() {
    let provisioner = provisioner();
    let workspace = tempdir().unwrap();
    let worker = provisioner
        .get_or_create_agent("backend", workspace.path())
        .await
        .unwrap();

    provisioner.remove_agent(&worker.container_id).await.unwrap();
    let healthy = provisioner.health_check(&worker).await;
    assert!(healthy.is_err() || healthy == Ok(false));
}
