use cloud_code_core::FileChange;
use serde::{Deserialize, Serialize};

/// Phrases that, if found in a tool's combined stdout+stderr, indicate the
/// tool believes it is mis-suited for the task at hand. Matching is
/// case-insensitive and advisory — false positives just trigger an
/// unnecessary handoff suggestion, not a hard failure.
pub const HANDOFF_PHRASES: &[&str] = &[
    "unable to resolve",
    "stuck",
    "cannot proceed",
    "need different approach",
    "out of my expertise",
    "i cannot",
    "beyond my capabilities",
];

/// Scans `combined_output` for any [`HANDOFF_PHRASES`] entry, case-insensitively.
pub fn detect_handoff(combined_output: &str) -> bool {
    let lower = combined_output.to_lowercase();
    HANDOFF_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// The outcome of a single coding-tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Whether the subprocess exited successfully and produced usable output.
    pub success: bool,
    /// Raw (or tool-parsed) textual output.
    pub output: String,
    /// Populated when `success` is false.
    pub error: Option<String>,
    /// Files the tool reported changing, if the variant can report this.
    pub files_changed: Vec<FileChange>,
    /// Set when [`detect_handoff`] matched the tool's output.
    pub needs_handoff: bool,
    /// Tokens consumed, if the variant reports usage.
    pub tokens_used: u64,
    /// Cost in USD, if the variant reports billing.
    pub cost_usd: f64,
}

impl ToolOutcome {
    /// Builds a bare success outcome with no usage/cost data (used by
    /// variants, like aider, that report nothing beyond an exit code).
    pub fn bare_success(output: impl Into<String>) -> Self {
        let output = output.into();
        let needs_handoff = detect_handoff(&output);
        Self {
            success: true,
            output,
            error: None,
            files_changed: Vec::new(),
            needs_handoff,
            tokens_used: 0,
            cost_usd: 0.0,
        }
    }

    /// Builds a bare failure outcome from an error message and any captured
    /// output, still subject to handoff-phrase scanning.
    pub fn bare_failure(output: impl Into<String>, error: impl Into<String>) -> Self {
        let output = output.into();
        let needs_handoff = detect_handoff(&output);
        Self {
            success: false,
            output,
            error: Some(error.into()),
            files_changed: Vec::new(),
            needs_handoff,
            tokens_used: 0,
            cost_usd: 0.0,
        }
    }
}
