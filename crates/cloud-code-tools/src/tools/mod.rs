//! Per-variant coding-tool adapters.

/// `aider --message <prompt> --yes --no-pretty`.
pub mod aider;
/// `claude -p <prompt> --output-format json ...`.
pub mod claude_code;
/// `codex`, `gemini`, `continue`, `cursor` — single-flag invocations.
pub mod simple;

pub use aider::Aider;
pub use claude_code::ClaudeCode;
pub use simple::SimpleCliTool;
