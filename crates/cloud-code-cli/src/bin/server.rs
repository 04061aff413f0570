//! `cloud-code-server`: runs the orchestrator's supervisor loop and the
//! GitHub webhook intake side by side, sharing one `Orchestrator` instance.

use clap::Parser;
use cloud_code_cli::config::{load, ServerConfig};
use cloud_code_cli::config_watcher::ConfigWatcher;
use cloud_code_containers::ContainerProvisioner;
use cloud_code_github::{GithubAdapter, GithubHooks, RestGithubClient};
use cloud_code_orchestrator::{NoopHooks, Orchestrator, OrchestratorHooks};
use cloud_code_secrets::EnvSecretStore;
use cloud_code_workspace::WorkspaceManager;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloud-code-server", about = "Task orchestrator and GitHub event intake")]
struct Cli {
    /// Path to the orchestrator's config file.
    #[arg(short, long, default_value = "cloud-code.toml")]
    config: PathBuf,
    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,
    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let cli = Cli::parse();
    let config: ServerConfig = load(&cli.config)?;
    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);

    let workspaces = WorkspaceManager::new(config.workspaces_root.clone())?;

    let secrets: Arc<dyn cloud_code_secrets::SecretStore> = match config.secrets.backend.as_str() {
        "env" => Arc::new(EnvSecretStore::new()),
        other => anyhow::bail!("unknown secrets backend '{other}'"),
    };
    let containers = Arc::new(ContainerProvisioner::new(config.docker_network.clone(), secrets)?);

    let hooks: Arc<dyn OrchestratorHooks> = match &config.github.api_token {
        Some(token) => {
            let client = Arc::new(RestGithubClient::new(token.clone()));
            Arc::new(GithubHooks::new(client, config.github.base_branch.clone()))
        }
        None => {
            info!("no github api token configured, terminal task hooks are no-ops");
            Arc::new(NoopHooks)
        }
    };

    let orchestrator = Arc::new(Orchestrator::new(workspaces, containers, hooks));

    let poll_interval = Arc::new(parking_lot::Mutex::new(config.poll_interval()));
    let _watcher = {
        let poll_interval = poll_interval.clone();
        ConfigWatcher::start(cli.config.clone(), 500, move |reload| {
            if let Some(secs) = reload.poll_interval_secs {
                *poll_interval.lock() = std::time::Duration::from_secs(secs);
                info!(secs, "poll interval hot-reloaded");
            }
        })
    };

    let stop = orchestrator.stop_handle();
    let supervisor = {
        let orchestrator = orchestrator.clone();
        let poll_interval = poll_interval.clone();
        tokio::spawn(async move {
            loop {
                if !stop.load(std::sync::atomic::Ordering::SeqCst) {
                    break;
                }
                orchestrator.poll_once().await;
                tokio::time::sleep(*poll_interval.lock()).await;
            }
        })
    };

    let adapter = Arc::new(GithubAdapter::new(orchestrator.clone(), config.github.workspace_mode));
    let webhook_config = cloud_code_github::WebhookConfig { secret: config.github.webhook_secret.clone() };
    let app = cloud_code_github::webhook::router(adapter, webhook_config);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr, "cloud-code-server listening");

    tokio::select! {
        result = axum::serve(listener, app) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            orchestrator.stop_handle().store(false, std::sync::atomic::Ordering::SeqCst);
        }
    }

    supervisor.abort();
    Ok(())
}
