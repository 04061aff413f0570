//! Low-level bollard operations: create, exec, inspect, stop, remove.
//!
//! [`crate::provisioner::ContainerProvisioner`] is the pool-management layer;
//! this module is the thin wrapper directly over the Docker API.

use crate::config::AgentTypeConfig;
use crate::error::{ContainerError, ContainerResult};
use bollard::container::{
    Config as ContainerConfig, CreateContainerOptions, LogOutput, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::models::HostConfig;
use bollard::Docker;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Creates and starts a container for the given agent type, bind-mounting
/// `workspace` (if any) at `/workspace` and attaching it to `network`.
///
/// The container's entrypoint is the `cloud-code-agent` binary baked into
/// the image; it reads its identity and workspace binding from `env` (set by
/// the caller) and polls the bound workspace for dispatched tasks on its own
/// for as long as the container lives.
pub async fn create_and_start(
    client: &Docker,
    name: &str,
    network: &str,
    config: &AgentTypeConfig,
    workspace: Option<&Path>,
    env: &HashMap<String, String>,
) -> ContainerResult<String> {
    let memory_bytes = (config.memory_limit_mb * 1024 * 1024) as i64;
    let cpu_quota = (100_000.0 * config.cpu_limit) as i64;

    let binds = workspace.map(|path| {
        vec![format!("{}:/workspace", path.display())]
    });

    let host_config = HostConfig {
        memory: Some(memory_bytes),
        cpu_quota: Some(cpu_quota),
        cpu_period: Some(100_000),
        network_mode: Some(network.to_string()),
        binds,
        ..Default::default()
    };

    let mut env_pairs: Vec<String> = env.iter().map(|(k, v)| format!("{k}={v}")).collect();
    env_pairs.sort();

    let container_config = ContainerConfig {
        image: Some(config.image.clone()),
        working_dir: Some("/workspace".to_string()),
        tty: Some(true),
        env: Some(env_pairs),
        cmd: Some(vec!["cloud-code-agent".to_string()]),
        host_config: Some(host_config),
        ..Default::default()
    };

    let created = client
        .create_container(
            Some(CreateContainerOptions {
                name: name.to_string(),
                ..Default::default()
            }),
            container_config,
        )
        .await?;

    client
        .start_container(&created.id, None::<StartContainerOptions<String>>)
        .await?;

    Ok(created.id)
}

/// Runs `argv` inside `container_id`'s working directory, returning
/// `(exit_code, stdout, stderr)`. A timeout forcibly stops draining output
/// and reports exit code `-1`.
pub async fn exec(
    client: &Docker,
    container_id: &str,
    argv: &[String],
    workdir: &str,
    timeout: Duration,
) -> ContainerResult<(i64, String, String)> {
    let exec_opts = CreateExecOptions {
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        cmd: Some(argv.to_vec()),
        working_dir: Some(workdir.to_string()),
        ..Default::default()
    };

    let exec_created = client.create_exec(container_id, exec_opts).await?;
    let start_result = client.start_exec(&exec_created.id, None).await?;

    let mut stdout = String::new();
    let mut stderr = String::new();

    if let StartExecResults::Attached { mut output, .. } = start_result {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, output.next()).await {
                Ok(Some(Ok(LogOutput::StdOut { message }))) => {
                    stdout.push_str(&String::from_utf8_lossy(&message));
                }
                Ok(Some(Ok(LogOutput::StdErr { message }))) => {
                    stderr.push_str(&String::from_utf8_lossy(&message));
                }
                Ok(Some(Ok(_))) => {}
                Ok(Some(Err(e))) => return Err(ContainerError::Docker(e)),
                Ok(None) => break,
                Err(_) => {
                    return Ok((-1, stdout, format!("exec timed out after {timeout:?}")));
                }
            }
        }
    }

    let inspect = client.inspect_exec(&exec_created.id).await?;
    let exit_code = inspect.exit_code.unwrap_or(-1);

    Ok((exit_code, stdout, stderr))
}

/// Whether the named container currently reports a running state.
pub async fn is_running(client: &Docker, container_id: &str) -> ContainerResult<bool> {
    let inspect = client.inspect_container(container_id, None).await?;
    Ok(inspect
        .state
        .and_then(|s| s.running)
        .unwrap_or(false))
}

/// Best-effort stop followed by a forced remove.
pub async fn stop_and_remove(client: &Docker, container_id: &str) -> ContainerResult<()> {
    let _ = client
        .stop_container(container_id, Some(StopContainerOptions { t: 5 }))
        .await;

    client
        .remove_container(
            container_id,
            Some(RemoveContainerOptions {
                force: true,
                ..Default::default()
            }),
        )
        .await?;

    Ok(())
}

/// Stops without removing.
pub async fn stop(client: &Docker, container_id: &str) -> ContainerResult<()> {
    client
        .stop_container(container_id, Some(StopContainerOptions { t: 5 }))
        .await?;
    Ok(())
}
