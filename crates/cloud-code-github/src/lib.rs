//! Event->Task Adapter (C7): turns GitHub webhook events into dispatched
//! tasks on an orchestrator, and terminal task reports back into pull
//! requests and comments.
//!
//! # Main types
//!
//! - [`GithubAdapter`] — translates webhook events into orchestrator calls.
//! - [`GithubHooks`] — [`cloud_code_orchestrator::OrchestratorHooks`] impl
//!   that opens pull requests and posts comments.
//! - [`webhook::router`] — the axum route accepting `POST /webhooks/github`.

/// Comment command grammar (`/cloud-code <action> [args]`).
pub mod comment_parser;
/// Crate error type.
pub mod error;
/// Webhook event handling, translating events into orchestrator calls.
pub mod events;
/// REST client for opening pull requests and posting comments.
pub mod github_client;
/// [`cloud_code_orchestrator::OrchestratorHooks`] impl backed by the GitHub API.
pub mod hooks;
/// Deserialized shapes of the GitHub webhook payloads this crate handles.
pub mod payloads;
/// Tracks which task id is bound to which issue.
pub mod registry;
/// HMAC-SHA256 webhook signature verification.
pub mod signature;
/// Builds tasks from issues and pull requests.
pub mod task_builder;
/// Axum webhook endpoint.
pub mod webhook;

pub use error::{GithubError, GithubResult};
pub use events::GithubAdapter;
pub use github_client::{GithubClient, NewPullRequest, RestGithubClient};
pub use hooks::GithubHooks;
pub use registry::IssueTaskRegistry;
pub use webhook::WebhookConfig;
