use crate::error::{ToolError, ToolResult};
use crate::tool::CodingTool;
use std::collections::HashMap;

/// Process-level registry mapping a coding-tool name to its adapter.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn CodingTool>>,
}

impl ToolRegistry {
    /// Builds a registry from a list of adapters, keyed by `CodingTool::name`.
    pub fn new(tools: Vec<Box<dyn CodingTool>>) -> Self {
        let tools = tools.into_iter().map(|t| (t.name().to_string(), t)).collect();
        Self { tools }
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> ToolResult<&dyn CodingTool> {
        self.tools
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Returns the names of every registered tool whose `is_available()` is true.
    pub async fn available_tools(&self) -> Vec<String> {
        let mut available = Vec::new();
        for (name, tool) in &self.tools {
            if tool.is_available().await {
                available.push(name.clone());
            }
        }
        available
    }

    /// Suggests an alternative tool for a handoff, preferring any other
    /// available tool over the one currently in use.
    ///
    /// Falls back to `claude-code` when nothing else is available, mirroring
    /// the system's default assumption that at least a Claude Code
    /// installation exists in every worker image.
    pub async fn suggest_alternative(&self, current: &str) -> String {
        let available = self.available_tools().await;
        available
            .into_iter()
            .find(|name| name != current)
            .unwrap_or_else(|| "claude-code".to_string())
    }
}
