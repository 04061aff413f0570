//! Shared configuration and error-reporting plumbing for the two process
//! entry points: `cloud-code-server` (orchestrator + GitHub webhook intake)
//! and `cloud-code-agent` (the control loop running inside a worker
//! container).

/// Layered `toml` configuration for both binaries.
pub mod config;
/// Hot-reload watcher for the runtime-safe configuration subset.
pub mod config_watcher;
/// Workspace-error-composing top-level error type.
pub mod error;

pub use error::{CliError, CliResult};
