//! Config hot-reload watcher.
//!
//! Watches a `cloud-code.toml` file for modifications and invokes a callback
//! with the freshly parsed [`ReloadableConfig`] after a debounce window.
//! Only the subset of configuration that is safe to change at runtime is
//! hot-reloadable; everything else (workspaces root, docker network) takes
//! effect only on the next process restart.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Subset of configuration safe to change without restarting a running
/// orchestrator or agent: poll intervals and timeouts, not the docker
/// network or workspaces root a process has already bound resources around.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReloadableConfig {
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    #[serde(default)]
    pub idle_poll_interval_secs: Option<u64>,
    #[serde(default)]
    pub agent_timeout_secs: Option<u64>,
}

/// Watches a config file on disk and calls back on every (debounced) change.
///
/// The watcher is kept alive as long as this struct is alive; dropping it
/// stops the background thread and releases the file-system watch.
pub struct ConfigWatcher {
    /// Stored to prevent the watcher from being dropped (which would stop
    /// watching the file).
    _watcher: Option<RecommendedWatcher>,
}

impl ConfigWatcher {
    /// Starts watching `config_path` for modifications, falling back to a
    /// periodic re-stat poll if the native watch backend cannot be
    /// installed (no inotify, a network filesystem).
    pub fn start<F>(config_path: PathBuf, debounce_ms: u64, on_reload: F) -> Self
    where
        F: Fn(ReloadableConfig) + Send + Sync + 'static,
    {
        let on_reload: Arc<dyn Fn(ReloadableConfig) + Send + Sync> = Arc::new(on_reload);
        match Self::start_native(&config_path, debounce_ms, on_reload.clone()) {
            Ok(watcher) => watcher,
            Err(e) => {
                tracing::warn!(error = %e, "native file watch unavailable, falling back to polling");
                Self::start_polling(config_path, Duration::from_millis(debounce_ms.max(1000)), on_reload)
            }
        }
    }

    fn start_native(
        config_path: &Path,
        debounce_ms: u64,
        on_reload: Arc<dyn Fn(ReloadableConfig) + Send + Sync>,
    ) -> notify::Result<Self> {
        let (tx, rx) = std_mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if matches!(event.kind, EventKind::Modify(_)) {
                    let _ = tx.send(());
                }
            }
        })?;

        watcher.watch(config_path, RecursiveMode::NonRecursive)?;

        let path = config_path.to_path_buf();
        std::thread::spawn(move || {
            let mut last_reload = std::time::Instant::now();
            let debounce = Duration::from_millis(debounce_ms);

            while rx.recv().is_ok() {
                while rx.try_recv().is_ok() {}

                let now = std::time::Instant::now();
                if now.duration_since(last_reload) < debounce {
                    std::thread::sleep(debounce - now.duration_since(last_reload));
                }
                last_reload = std::time::Instant::now();

                match parse_config(&path) {
                    Ok(config) => on_reload(config),
                    Err(e) => tracing::warn!(error = %e, "failed to reload config"),
                }
            }
        });

        tracing::info!(path = %config_path.display(), "config hot-reload watcher started (inotify)");
        Ok(Self { _watcher: Some(watcher) })
    }

    fn start_polling(
        config_path: PathBuf,
        interval: Duration,
        on_reload: Arc<dyn Fn(ReloadableConfig) + Send + Sync>,
    ) -> Self {
        std::thread::spawn(move || {
            let mut last_modified: Option<SystemTime> = None;
            loop {
                std::thread::sleep(interval);
                let Ok(metadata) = std::fs::metadata(&config_path) else { continue };
                let Ok(modified) = metadata.modified() else { continue };
                if last_modified == Some(modified) {
                    continue;
                }
                last_modified = Some(modified);
                match parse_config(&config_path) {
                    Ok(config) => on_reload(config),
                    Err(e) => tracing::warn!(error = %e, "failed to reload config"),
                }
            }
        });

        tracing::info!(path = %config_path.display(), "config hot-reload watcher started (polling fallback)");
        Self { _watcher: None }
    }
}

/// Reads and parses a `toml` config file into a [`ReloadableConfig`].
pub fn parse_config(path: &Path) -> Result<ReloadableConfig, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("failed to read config '{}': {e}", path.display()))?;
    toml::from_str(&content).map_err(|e| format!("failed to parse config '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_reloadable_sections() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "poll_interval_secs = 30").unwrap();
        let config = parse_config(tmp.path()).unwrap();
        assert_eq!(config.poll_interval_secs, Some(30));
        assert_eq!(config.idle_poll_interval_secs, None);
    }

    #[test]
    fn empty_config_is_all_none() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = parse_config(tmp.path()).unwrap();
        assert_eq!(config.poll_interval_secs, None);
        assert_eq!(config.agent_timeout_secs, None);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "{{{{not valid").unwrap();
        assert!(parse_config(tmp.path()).is_err());
    }
}
