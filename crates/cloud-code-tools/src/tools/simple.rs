use crate::error::ToolResult;
use crate::outcome::ToolOutcome;
use crate::tool::{binary_on_path, run_with_timeout, CodingTool};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// A coding tool invoked as a single `<binary> <flag> <prompt>` call, with
/// the exit code alone deciding success — the same shape as `aider`, used by
/// variants whose own CLI the distillation left unspecified.
pub struct SimpleCliTool {
    name: &'static str,
    binary: &'static str,
    prompt_flag: &'static str,
    env: HashMap<String, String>,
}

impl SimpleCliTool {
    /// Builds the `codex` adapter (`codex exec <prompt>`).
    pub fn codex(env: HashMap<String, String>) -> Self {
        Self {
            name: "codex",
            binary: "codex",
            prompt_flag: "exec",
            env,
        }
    }

    /// Builds the `gemini` adapter (`gemini -p <prompt>`).
    pub fn gemini(env: HashMap<String, String>) -> Self {
        Self {
            name: "gemini",
            binary: "gemini",
            prompt_flag: "-p",
            env,
        }
    }

    /// Builds the `continue` adapter (`cn -p <prompt>`).
    pub fn cont(env: HashMap<String, String>) -> Self {
        Self {
            name: "continue",
            binary: "cn",
            prompt_flag: "-p",
            env,
        }
    }

    /// Builds the `cursor` adapter (`cursor-agent -p <prompt>`).
    pub fn cursor(env: HashMap<String, String>) -> Self {
        Self {
            name: "cursor",
            binary: "cursor-agent",
            prompt_flag: "-p",
            env,
        }
    }
}

#[async_trait]
impl CodingTool for SimpleCliTool {
    fn name(&self) -> &str {
        self.name
    }

    async fn is_available(&self) -> bool {
        binary_on_path(self.binary).await
    }

    async fn execute(
        &self,
        prompt: &str,
        workspace: &Path,
        timeout: Duration,
    ) -> ToolResult<ToolOutcome> {
        let args = [self.prompt_flag, prompt];
        let (exited_ok, stdout, stderr) =
            run_with_timeout(self.binary, &args, workspace, &self.env, timeout).await?;

        let combined = format!("{stdout}\n{stderr}");
        if exited_ok {
            Ok(ToolOutcome::bare_success(combined))
        } else {
            Ok(ToolOutcome::bare_failure(combined, stderr))
        }
    }
}
