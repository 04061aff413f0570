//! Container Provisioner (C4): manages the pool of worker containers that
//! host each coding-tool adapter.
//!
//! Containers are keyed by `agent_type` (frontend, backend, reviewer,
//! testing, devops, database, plus one entry per alternative CLI used only
//! as a handoff target). Each type carries a fixed image, resource limits,
//! and coding tool; [`ContainerProvisioner`] starts, reuses, execs inside,
//! health-checks, and tears down the containers that back them.

/// Per-`agent_type` resource and image configuration.
pub mod config;
/// Thin wrapper over the bollard API: create, exec, inspect, stop, remove.
pub mod docker;
/// Shared error type.
pub mod error;
/// The worker pool itself.
pub mod provisioner;

pub use config::{default_configs, AgentTypeConfig};
pub use error::{ContainerError, ContainerResult};
pub use provisioner::{ContainerProvisioner, WorkerProvisioner};
