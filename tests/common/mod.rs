//! Shared helpers for integration tests.
#![allow(dead_code)]

use serde_json::{json, Value};
use usd_nim_mcp::{
    config::{Config, ConfigOverrides},
    mcp::session::run_session,
    AppState,
};

pub const TEST_API_KEY: &str = "nvapi-test-key";
pub const TEST_MODEL: &str = "test/usd-model";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// State pointing at `base_url` (usually a mockito server).
pub fn state_for(base_url: &str, api_key: Option<&str>) -> AppState {
    let overrides = ConfigOverrides {
        api_key: api_key.map(str::to_string),
        endpoint: Some(format!("{}{}", base_url, COMPLETIONS_PATH)),
        model: Some(TEST_MODEL.to_string()),
        ..Default::default()
    };
    AppState::new(Config::resolve(overrides, |_| None).expect("test config"))
}

/// State that never reaches a server: no credential, default endpoint.
pub fn offline_state() -> AppState {
    AppState::new(Config::resolve(ConfigOverrides::default(), |_| None).expect("test config"))
}

/// OpenAI-style completion body with a single choice.
pub fn completion_body(text: &str) -> String {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion",
        "model": TEST_MODEL,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn empty_completion_body() -> String {
    json!({ "id": "cmpl-test", "object": "chat.completion", "choices": [] }).to_string()
}

/// Feeds `input` through a full session and returns each output line parsed.
pub async fn run_lines(input: &str, state: &AppState) -> Vec<Value> {
    let raw = run_raw(input.as_bytes(), state).await;
    raw.lines()
        .map(|line| serde_json::from_str(line).expect("every output line is JSON"))
        .collect()
}

pub async fn run_raw(input: &[u8], state: &AppState) -> String {
    let mut output = Vec::new();
    run_session(input, &mut output, state)
        .await
        .expect("session runs to EOF");
    String::from_utf8(output).expect("utf8 output")
}

pub fn tool_call(id: i64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
}
