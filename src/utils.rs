//! Utility functions for the USD NIM MCP server

use serde::de::DeserializeOwned;
use serde_json::{from_value, json, Value};
use crate::mcp::protocol::{Response, error_codes};

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

/// Optional string argument; values of any other type are treated as absent.
pub fn get_optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Wraps `text` as MCP text content. Object payloads keep their own fields
/// next to `content`; anything else is nested under `data`.
pub fn make_texty_result(text: String, payload: Value) -> Value {
    let content = text_content(text);
    match payload {
        Value::Object(mut map) => {
            // Do not overwrite if caller already set content
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

pub fn text_content(text: String) -> Value {
    json!([{ "type": "text", "text": text }])
}
