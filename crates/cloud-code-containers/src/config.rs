use std::collections::HashMap;

/// Per-`agent_type` provisioning parameters.
#[derive(Debug, Clone)]
pub struct AgentTypeConfig {
    /// Docker image to run.
    pub image: String,
    /// Memory limit in megabytes.
    pub memory_limit_mb: u64,
    /// CPU core limit (fractional cores, e.g. `1.5`).
    pub cpu_limit: f64,
    /// Coding-tool adapter this container runs.
    pub coding_tool: String,
    /// Extra environment variables layered on top of secret-store values.
    pub extra_env: HashMap<String, String>,
}

impl AgentTypeConfig {
    fn new(image: &str, memory_limit_mb: u64, cpu_limit: f64, coding_tool: &str) -> Self {
        Self {
            image: image.to_string(),
            memory_limit_mb,
            cpu_limit,
            coding_tool: coding_tool.to_string(),
            extra_env: HashMap::new(),
        }
    }
}

/// The standard agent-type table: the six task-domain roles, each driven by
/// `claude-code`, plus one bare entry per alternative CLI used purely as a
/// handoff target when a role's primary tool reports it is stuck.
pub fn default_configs() -> HashMap<String, AgentTypeConfig> {
    let image = "ghcr.io/cloud-code/worker-base:latest";
    let mut configs = HashMap::new();

    for role in ["frontend", "backend", "reviewer", "testing", "devops", "database"] {
        configs.insert(role.to_string(), AgentTypeConfig::new(image, 2048, 2.0, "claude-code"));
    }

    for tool in ["aider", "codex", "gemini", "continue", "cursor"] {
        configs.insert(tool.to_string(), AgentTypeConfig::new(image, 2048, 2.0, tool));
    }

    configs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_task_domain_role_is_present_and_uses_claude_code() {
        let configs = default_configs();
        for role in ["frontend", "backend", "reviewer", "testing", "devops", "database"] {
            let config = configs.get(role).unwrap_or_else(|| panic!("missing role {role}"));
            assert_eq!(config.coding_tool, "claude-code");
        }
    }

    #[test]
    fn handoff_only_tools_are_present_and_self_named() {
        let configs = default_configs();
        for tool in ["aider", "codex", "gemini", "continue", "cursor"] {
            let config = configs.get(tool).unwrap_or_else(|| panic!("missing tool {tool}"));
            assert_eq!(config.coding_tool, tool);
        }
    }

    #[test]
    fn table_has_no_unexpected_entries() {
        assert_eq!(default_configs().len(), 11);
    }
}
