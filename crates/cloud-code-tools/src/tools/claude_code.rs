use crate::error::ToolResult;
use crate::outcome::{detect_handoff, ToolOutcome};
use crate::tool::{binary_on_path, run_with_timeout, CodingTool};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Runs the `claude` CLI in headless mode.
///
/// Parses the last JSON-parseable line of stdout, matching the tool's own
/// convention of interleaving progress events with one final result object.
pub struct ClaudeCode {
    env: HashMap<String, String>,
}

impl ClaudeCode {
    /// Builds the adapter with the environment (API keys, model override)
    /// the secret store resolved for this tool.
    pub fn new(env: HashMap<String, String>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl CodingTool for ClaudeCode {
    fn name(&self) -> &str {
        "claude-code"
    }

    async fn is_available(&self) -> bool {
        binary_on_path("claude").await
    }

    async fn execute(
        &self,
        prompt: &str,
        workspace: &Path,
        timeout: Duration,
    ) -> ToolResult<ToolOutcome> {
        let args = [
            "-p",
            prompt,
            "--output-format",
            "json",
            "--max-turns",
            "30",
            "--permission-mode",
            "acceptEdits",
        ];
        let (exited_ok, stdout, stderr) =
            run_with_timeout("claude", &args, workspace, &self.env, timeout).await?;

        let combined = format!("{stdout}\n{stderr}");
        let needs_handoff = detect_handoff(&combined);

        let parsed = stdout
            .lines()
            .rev()
            .find_map(|line| serde_json::from_str::<serde_json::Value>(line).ok());

        let Some(result_json) = parsed else {
            return Ok(ToolOutcome {
                success: false,
                output: stdout,
                error: Some(format!("could not parse claude output as JSON: {stderr}")),
                files_changed: Vec::new(),
                needs_handoff,
                tokens_used: 0,
                cost_usd: 0.0,
            });
        };

        let is_error = result_json["is_error"].as_bool().unwrap_or(false);
        let result_text = result_json["result"].as_str().unwrap_or_default().to_string();
        let input_tokens = result_json["usage"]["input_tokens"].as_u64().unwrap_or(0);
        let output_tokens = result_json["usage"]["output_tokens"].as_u64().unwrap_or(0);
        let cost_usd = result_json["total_cost_usd"].as_f64().unwrap_or(0.0);

        Ok(ToolOutcome {
            success: exited_ok && !is_error,
            output: result_text,
            error: if is_error {
                Some(result_json["result"].as_str().unwrap_or("unknown error").to_string())
            } else {
                None
            },
            files_changed: Vec::new(),
            needs_handoff,
            tokens_used: input_tokens + output_tokens,
            cost_usd,
        })
    }
}
