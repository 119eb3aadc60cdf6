//! Fixed credentials and configuration maps for tests.

use std::collections::HashMap;

/// Room-service API key used by test servers.
pub const TEST_API_KEY: &str = "APItestkey";

/// Room-service API secret used by test servers.
pub const TEST_API_SECRET: &str = "test-livekit-secret-0123456789abcdef";

/// Room-service URL returned by test servers.
pub const TEST_LIVEKIT_URL: &str = "wss://rooms.test.local";

/// Variables for a server with no integration credentials at all.
pub fn unconfigured_vars() -> HashMap<String, String> {
    HashMap::from([
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("WT_DRAIN_SECONDS".to_string(), "0".to_string()),
    ])
}

/// Variables for a server that can sign room tokens.
pub fn signing_vars() -> HashMap<String, String> {
    let mut vars = unconfigured_vars();
    vars.insert("LIVEKIT_API_KEY".to_string(), TEST_API_KEY.to_string());
    vars.insert("LIVEKIT_API_SECRET".to_string(), TEST_API_SECRET.to_string());
    vars.insert("LIVEKIT_URL".to_string(), TEST_LIVEKIT_URL.to_string());
    vars
}

/// Variables for a server that signs tokens and calls a provider at `base_url`.
pub fn llm_vars(base_url: &str) -> HashMap<String, String> {
    let mut vars = signing_vars();
    vars.insert("OPENAI_API_KEY".to_string(), "sk-test".to_string());
    vars.insert("OPENAI_BASE_URL".to_string(), base_url.to_string());
    vars.insert("LLM_TIMEOUT_SECONDS".to_string(), "5".to_string());
    vars
}
