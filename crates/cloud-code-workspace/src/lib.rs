//! Workspace Manager (C2): shared, isolated, and copy-on-write git checkouts.
//!
//! A [`WorkspaceManager`] keeps one cached main checkout per `(owner, repo)`
//! and provisions task-private checkouts over it in one of three modes. See
//! [`cloud_code_core::WorkspaceMode`] for the mode definitions.
//!
//! # Main types
//!
//! - [`WorkspaceManager`] — provisions and reclaims workspaces.
//! - [`WorkspaceError`] — git and filesystem failures surfaced to callers.

/// Error type for this crate.
pub mod error;
/// Low-level git2 operations: clone, fetch, worktree add/prune, checkout.
pub mod git;
/// Workspace provisioning and reclamation.
pub mod manager;

pub use error::{WorkspaceError, WorkspaceResult};
pub use manager::WorkspaceManager;
