//! Tests for the shared subprocess execution helper.

use cloud_code_tools::{run_with_timeout, ToolError};
use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;
use tempfile::tempdir;

fn write_script(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[tokio::test]
async fn captures_stdout_and_success_on_exit_zero() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "ok.sh", "echo hello-from-tool");

    let (success, stdout, _stderr) = run_with_timeout(
        script.to_str().unwrap(),
        &[],
        dir.path(),
        &HashMap::new(),
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert!(success);
    assert!(stdout.contains("hello-from-tool"));
}

#[tokio::test]
async fn nonzero_exit_is_reported_as_failure() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "fail.sh", "echo boom 1>&2\nexit 1");

    let (success, _stdout, stderr) = run_with_timeout(
        script.to_str().unwrap(),
        &[],
        dir.path(),
        &HashMap::new(),
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert!(!success);
    assert!(stderr.contains("boom"));
}

#[tokio::test]
async fn long_running_process_is_killed_on_timeout() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "slow.sh", "sleep 30");

    let result = run_with_timeout(
        script.to_str().unwrap(),
        &[],
        dir.path(),
        &HashMap::new(),
        Duration::from_millis(100),
    )
    .await;

    assert!(matches!(result, Err(ToolError::Timeout(_))));
}
