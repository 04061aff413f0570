//! `cloud-code-agent`: the control loop running inside one worker container.
//!
//! Reads its own identity and workspace binding from the environment (set
//! by the container provisioner at creation time), builds the coding-tool
//! adapter matching its assigned tool, and runs [`AgentLoop`] until a
//! `SIGTERM`/ctrl-c signal flips its stop handle.

use clap::Parser;
use cloud_code_agent::AgentLoop;
use cloud_code_cli::config::{load, AgentConfig};
use cloud_code_cli::config_watcher::ConfigWatcher;
use cloud_code_secrets::{agent_env, EnvSecretStore, SecretStore};
use cloud_code_tools::tools::{Aider, ClaudeCode, SimpleCliTool};
use cloud_code_tools::{CodingTool, ToolRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloud-code-agent", about = "Control loop running inside one worker container")]
struct Cli {
    /// Path to the agent's config file.
    #[arg(short, long, default_value = "cloud-code.toml")]
    config: PathBuf,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn build_tool(coding_tool: &str, env: std::collections::HashMap<String, String>) -> anyhow::Result<Box<dyn CodingTool>> {
    let tool: Box<dyn CodingTool> = match coding_tool {
        "claude-code" => Box::new(ClaudeCode::new(env)),
        "aider" => Box::new(Aider::new(env)),
        "codex" => Box::new(SimpleCliTool::codex(env)),
        "gemini" => Box::new(SimpleCliTool::gemini(env)),
        "continue" => Box::new(SimpleCliTool::cont(env)),
        "cursor" => Box::new(SimpleCliTool::cursor(env)),
        other => anyhow::bail!("unknown coding tool '{other}'"),
    };
    Ok(tool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let cli = Cli::parse();
    let config: AgentConfig = load(&cli.config)?;

    let workspace_path = PathBuf::from(env_or("WORKSPACE", "/workspace"));
    let agent_type = env_or("AGENT_TYPE", "backend");
    let agent_id = env_or("AGENT_ID", "agent-unknown");
    let coding_tool = env_or("CODING_TOOL", "claude-code");

    let secrets: Arc<dyn SecretStore> = Arc::new(EnvSecretStore::new());
    let env = agent_env(secrets.as_ref(), &coding_tool).await;

    let primary = Arc::from(build_tool(&coding_tool, env.clone())?);
    let registry = Arc::new(ToolRegistry::new(vec![
        build_tool("claude-code", env.clone())?,
        build_tool("aider", env.clone())?,
        build_tool("codex", env.clone())?,
        build_tool("gemini", env.clone())?,
        build_tool("continue", env.clone())?,
        build_tool("cursor", env)?,
    ]));

    info!(agent_type, agent_id, coding_tool, workspace = %workspace_path.display(), "starting agent control loop");

    let agent_loop = Arc::new(AgentLoop::new(
        workspace_path,
        agent_type,
        agent_id,
        primary,
        registry,
        config.idle_poll_interval(),
        config.agent_timeout(),
    ));

    let _watcher = {
        let agent_loop = agent_loop.clone();
        ConfigWatcher::start(cli.config.clone(), 500, move |reload| {
            if let Some(secs) = reload.idle_poll_interval_secs {
                agent_loop.set_idle_poll_interval(std::time::Duration::from_secs(secs));
            }
            if let Some(secs) = reload.agent_timeout_secs {
                agent_loop.set_agent_timeout(std::time::Duration::from_secs(secs));
            }
        })
    };

    let stop = agent_loop.stop_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
        stop.store(false, std::sync::atomic::Ordering::SeqCst);
    });

    agent_loop.run().await?;
    Ok(())
}
