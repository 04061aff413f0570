//! Tests for the environment-backed reference secret store.

use cloud_code_secrets::{agent_env, paths, EnvSecretStore, SecretStore};

#[tokio::test]
async fn missing_key_surfaces_not_found() {
    let store = EnvSecretStore::new();
    let result = store
        .get(&paths::cli("codex"), "CLOUD_CODE_TEST_MISSING_VAR_XYZ")
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn present_env_var_is_returned() {
    std::env::set_var("CLOUD_CODE_TEST_ANTHROPIC_API_KEY", "sk-test-123");
    let store = EnvSecretStore::new();
    let value = store
        .get(&paths::cli("claude-code"), "CLOUD_CODE_TEST_ANTHROPIC_API_KEY")
        .await
        .unwrap();
    assert_eq!(value, "sk-test-123");
    std::env::remove_var("CLOUD_CODE_TEST_ANTHROPIC_API_KEY");
}

#[tokio::test]
async fn agent_env_omits_unset_keys_without_erroring() {
    let store = EnvSecretStore::new();
    // None of the real key names are likely to be set in a test environment,
    // so this should resolve to an empty map rather than failing.
    let env = agent_env(&store, "gemini").await;
    assert!(env.get("GOOGLE_API_KEY").is_none() || !env["GOOGLE_API_KEY"].is_empty());
}

#[tokio::test]
async fn unknown_coding_tool_yields_empty_env() {
    let store = EnvSecretStore::new();
    let env = agent_env(&store, "not-a-real-tool").await;
    assert!(env.is_empty());
}
