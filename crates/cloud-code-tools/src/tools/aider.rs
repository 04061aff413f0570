use crate::error::ToolResult;
use crate::outcome::ToolOutcome;
use crate::tool::{binary_on_path, run_with_timeout, CodingTool};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Runs `aider`. Aider has no structured output mode, so the exit code alone
/// decides success.
pub struct Aider {
    env: HashMap<String, String>,
}

impl Aider {
    /// Builds the adapter with the environment the secret store resolved.
    pub fn new(env: HashMap<String, String>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl CodingTool for Aider {
    fn name(&self) -> &str {
        "aider"
    }

    async fn is_available(&self) -> bool {
        binary_on_path("aider").await
    }

    async fn execute(
        &self,
        prompt: &str,
        workspace: &Path,
        timeout: Duration,
    ) -> ToolResult<ToolOutcome> {
        let args = ["--message", prompt, "--yes", "--no-pretty"];
        let (exited_ok, stdout, stderr) =
            run_with_timeout("aider", &args, workspace, &self.env, timeout).await?;

        let combined = format!("{stdout}\n{stderr}");
        if exited_ok {
            Ok(ToolOutcome::bare_success(combined))
        } else {
            Ok(ToolOutcome::bare_failure(combined, stderr))
        }
    }
}
