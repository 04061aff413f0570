use crate::error::{ToolError, ToolResult};
use crate::outcome::ToolOutcome;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Polymorphic interface over an external coding-tool CLI.
///
/// Each variant maps `(prompt, workspace, timeout)` to a specific command
/// line and environment; see the individual modules under `tools/` for the
/// exact invocation.
#[async_trait]
pub trait CodingTool: Send + Sync {
    /// Stable name used in the registry and in `recommend_handoff:<name>` reasons.
    fn name(&self) -> &str;

    /// Whether this tool's binary is present on `PATH`.
    async fn is_available(&self) -> bool;

    /// Runs the tool against `prompt` inside `workspace`, bounded by `timeout`.
    async fn execute(
        &self,
        prompt: &str,
        workspace: &Path,
        timeout: Duration,
    ) -> ToolResult<ToolOutcome>;
}

/// Checks whether `binary` resolves on `PATH`, the standard Unix way of
/// testing availability without actually invoking the tool.
pub async fn binary_on_path(binary: &str) -> bool {
    tokio::process::Command::new("which")
        .arg(binary)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Spawns `binary` with `args` inside `workspace`, with `env` merged into
/// the child's environment, and waits up to `timeout` for it to finish.
///
/// Returns `(exit_success, stdout, stderr)` on completion, or
/// [`ToolError::Timeout`] if the process is still running when the timeout
/// elapses (the process is killed before the error is returned).
pub async fn run_with_timeout(
    binary: &str,
    args: &[&str],
    workspace: &Path,
    env: &HashMap<String, String>,
    timeout: Duration,
) -> ToolResult<(bool, String, String)> {
    use tokio::io::AsyncReadExt as _;

    let mut cmd = tokio::process::Command::new(binary);
    cmd.args(args)
        .current_dir(workspace)
        .envs(env)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ToolError::Spawn {
        binary: binary.to_string(),
        source,
    })?;
    let pipe_err = || ToolError::Spawn {
        binary: binary.to_string(),
        source: std::io::Error::other("child stdio pipe missing"),
    };
    let mut stdout_pipe = child.stdout.take().ok_or_else(pipe_err)?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(pipe_err)?;

    let wait_fut = async {
        let status = child.wait().await?;
        let mut stdout = String::new();
        stdout_pipe.read_to_string(&mut stdout).await?;
        let mut stderr = String::new();
        stderr_pipe.read_to_string(&mut stderr).await?;
        Ok::<_, std::io::Error>((status, stdout, stderr))
    };

    match tokio::time::timeout(timeout, wait_fut).await {
        Ok(Ok((status, stdout, stderr))) => Ok((status.success(), stdout, stderr)),
        Ok(Err(source)) => Err(ToolError::Spawn {
            binary: binary.to_string(),
            source,
        }),
        Err(_) => {
            let _ = child.kill().await;
            Err(ToolError::Timeout(timeout.as_secs()))
        }
    }
}
