use regex::Regex;
use std::sync::OnceLock;

/// A parsed `/cloud-code <action> [args]` comment command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `run [agent_type]` — start working on the issue.
    Run { agent_type: Option<String> },
    /// `cancel` — cancel the active task.
    Cancel,
    /// `status` — report the active task's current status.
    Status,
    /// `handoff <agent_type>` — hand off to a different agent type.
    Handoff { target_agent: Option<String> },
    /// `retry` — re-dispatch the same task.
    Retry,
    /// `approve` — grant the most recent pending credential request.
    Approve,
    /// `reject [reason]` — reject pending changes.
    Reject { reason: Option<String> },
    /// `config <key> <value>` — set a per-task configuration value.
    Config { key: String, value: Option<String> },
}

fn command_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mi)^/cloud-code\s+(\w+)(?:\s+(.*))?$").expect("static pattern is valid")
    })
}

/// Parses the first `/cloud-code` command found in a comment body.
/// Returns `None` if no command is present, case-insensitive, multiline.
pub fn parse_command(comment_body: &str) -> Option<Command> {
    let captures = command_pattern().captures(comment_body)?;
    let action = captures.get(1)?.as_str().to_lowercase();
    let args = captures.get(2).map(|m| m.as_str().trim()).filter(|s| !s.is_empty());

    let command = match action.as_str() {
        "run" => Command::Run {
            agent_type: args.and_then(|a| a.split_whitespace().next()).map(str::to_string),
        },
        "cancel" => Command::Cancel,
        "status" => Command::Status,
        "handoff" => Command::Handoff {
            target_agent: args.and_then(|a| a.split_whitespace().next()).map(str::to_string),
        },
        "retry" => Command::Retry,
        "approve" => Command::Approve,
        "reject" => Command::Reject { reason: args.map(str::to_string) },
        "config" => {
            let mut parts = args.unwrap_or_default().splitn(2, char::is_whitespace);
            let key = parts.next()?.to_string();
            let value = parts.next().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            Command::Config { key, value }
        }
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_run_with_no_args() {
        assert_eq!(parse_command("/cloud-code run"), Some(Command::Run { agent_type: None }));
    }

    #[test]
    fn run_with_agent_type() {
        assert_eq!(
            parse_command("please\n/cloud-code run frontend\nthanks"),
            Some(Command::Run { agent_type: Some("frontend".to_string()) })
        );
    }

    #[test]
    fn handoff_with_target() {
        assert_eq!(
            parse_command("hello\n/cloud-code handoff backend\nthanks"),
            Some(Command::Handoff { target_agent: Some("backend".to_string()) })
        );
    }

    #[test]
    fn case_insensitive_and_uppercase_action() {
        assert_eq!(
            parse_command("/CLOUD-CODE run frontend"),
            Some(Command::Run { agent_type: Some("frontend".to_string()) })
        );
    }

    #[test]
    fn reject_keeps_free_text_reason() {
        assert_eq!(
            parse_command("/cloud-code reject this breaks the build"),
            Some(Command::Reject { reason: Some("this breaks the build".to_string()) })
        );
    }

    #[test]
    fn config_splits_key_and_rest_of_line() {
        assert_eq!(
            parse_command("/cloud-code config agent_timeout_seconds 7200"),
            Some(Command::Config {
                key: "agent_timeout_seconds".to_string(),
                value: Some("7200".to_string())
            })
        );
    }

    #[test]
    fn body_without_prefix_parses_to_none() {
        assert_eq!(parse_command("just a regular comment"), None);
    }
}
