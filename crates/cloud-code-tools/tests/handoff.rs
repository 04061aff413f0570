//! Tests for handoff-phrase detection and the tool outcome helpers.

use cloud_code_tools::{detect_handoff, ToolOutcome};

#[test]
fn detects_each_handoff_phrase_case_insensitively() {
    assert!(detect_handoff("I am completely STUCK on this one"));
    assert!(detect_handoff("this is Out Of My Expertise"));
    assert!(detect_handoff("I Cannot safely make this change"));
    assert!(!detect_handoff("the task completed successfully"));
}

#[test]
fn bare_success_scans_for_handoff_too() {
    let outcome = ToolOutcome::bare_success("done, but this is beyond my capabilities");
    assert!(outcome.success);
    assert!(outcome.needs_handoff);
}

#[test]
fn bare_failure_carries_the_error_message() {
    let outcome = ToolOutcome::bare_failure("stdout here", "exit code 1");
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("exit code 1"));
}
