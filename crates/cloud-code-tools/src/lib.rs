//! Coding-Tool Adapter (C3): a polymorphic subprocess wrapper over external
//! coding CLIs.
//!
//! Six variants — claude-code, aider, codex, gemini, continue, cursor — share
//! one trait, [`CodingTool`], and one [`ToolOutcome`] shape. A [`ToolRegistry`]
//! tracks which variants are actually installed on the host and can suggest
//! an alternative when a running tool reports it is stuck.
//!
//! # Main types
//!
//! - [`CodingTool`] — the adapter trait every variant implements.
//! - [`ToolOutcome`] — result of a single tool invocation.
//! - [`ToolRegistry`] — name → adapter lookup and availability filtering.
//! - [`tools`] — the six concrete adapters.

/// Shared error type.
pub mod error;
/// Handoff-phrase scanning and the `ToolOutcome` result shape.
pub mod outcome;
/// Registry mapping tool name to adapter.
pub mod registry;
/// The `CodingTool` trait and subprocess execution helpers.
pub mod tool;
/// Concrete per-variant adapters.
pub mod tools;

pub use error::{ToolError, ToolResult};
pub use outcome::{detect_handoff, ToolOutcome, HANDOFF_PHRASES};
pub use registry::ToolRegistry;
pub use tool::{binary_on_path, run_with_timeout, CodingTool};
