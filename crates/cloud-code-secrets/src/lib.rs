//! Secret Store: per-coding-tool credential resolution.
//!
//! Defines the [`SecretStore`] trait and the `cloud-code/...` path
//! conventions the rest of the system uses to namespace secrets in an
//! external vault, plus [`EnvSecretStore`] as a reference implementation for
//! local development. Wiring this crate up to a real secret manager (Vault,
//! AWS Secrets Manager, etc.) is left to the deployment.
//!
//! # Main types
//!
//! - [`SecretStore`] — trait implemented by any backing secret manager.
//! - [`EnvSecretStore`] — environment-variable-backed reference implementation.
//! - [`agent_env`] — maps a coding tool name to the env vars its subprocess needs.

/// Environment-variable-backed reference implementation.
pub mod env_store;
/// Error type for this crate.
pub mod error;
/// The `SecretStore` trait, path conventions, and the agent-env mapping helper.
pub mod store;

pub use env_store::EnvSecretStore;
pub use error::{SecretError, SecretResult};
pub use store::{agent_env, paths, SecretStore};
