//! Task Interface (C1): atomic tasking/reporting document I/O.
//!
//! Two independent facades share one on-disk format and one atomic-replace
//! primitive: [`OrchestratorTaskInterface`] writes tasks and reads reports,
//! [`AgentTaskInterface`] reads tasks and writes reports. Neither side takes
//! a lock — correctness rests on the single-writer-per-document invariant
//! plus the atomicity of a file rename.
//!
//! # Main types
//!
//! - [`OrchestratorTaskInterface`] — orchestrator-side document operations.
//! - [`AgentTaskInterface`] — agent-side document operations.
//! - [`TaskInterfaceError`] — shared error type for both facades.

/// Agent-side document operations.
pub mod agent;
/// Atomic document load/replace primitives.
pub mod atomic;
/// Error type for this crate.
pub mod error;
/// Orchestrator-side document operations.
pub mod orchestrator;

pub use agent::AgentTaskInterface;
pub use atomic::{atomic_write_yaml, load_or_default};
pub use error::{TaskInterfaceError, TaskInterfaceResult};
pub use orchestrator::OrchestratorTaskInterface;
