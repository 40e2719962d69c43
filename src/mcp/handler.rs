//! # MCP Handler Module
//!
//! Maps JSON-RPC methods onto responses for the USD NIM server.
//!
//! ## Methods
//! - `initialize` - server info and capabilities for the configured protocol revision
//! - `initialized` / `notifications/initialized` - handshake notification, never answered
//! - `tools/list` - the static tool table
//! - `tools/call` - runs one of the tools below against the remote NIM API
//!
//! ## Supported Tools
//! - `validate_usd_code` - review USD Python code, returning a structured verdict
//! - `generate_usd_code` - generate USD Python code from a description
//!
//! Notifications are never answered, whatever their method.

use std::fmt::Display;

use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::{
    completion::{services, CompletionClient},
    config::ProtocolVariant,
    mcp::{
        protocol::{error_codes, Request, Response},
        tools::{GENERATE_USD_CODE, TOOL_DESCRIPTORS, VALIDATE_USD_CODE},
    },
    utils, AppState,
};

pub const SERVER_NAME: &str = "nvidia-nim";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str =
    "USD code assistant backed by NVIDIA NIM. Use validate_usd_code to review USD Python code \
     and generate_usd_code to write new code.";

/// This is the main dispatcher for all incoming MCP requests.
///
/// Returns `None` when no response must be sent.
pub async fn handle_mcp_request(req: Request, state: &AppState) -> Option<Response> {
    info!(method = %req.method, "Handling MCP request");

    if req.is_notification() {
        handle_notification(&req);
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req, state.config.protocol),
        // Handshake acknowledgement, even when a client attaches an id
        "initialized" | "notifications/initialized" => return None,
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(&req, state).await,
        _ => Response::error(
            req.response_id(),
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown method: {}", req.method),
        ),
    };

    Some(response)
}

fn handle_notification(req: &Request) {
    match req.method.as_str() {
        "initialized" | "notifications/initialized" => info!("Client initialization complete"),
        other => debug!(method = %other, "Ignoring notification"),
    }
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request, protocol: ProtocolVariant) -> Response {
    if let Some(params) = req.params.as_ref() {
        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let requested = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or("unspecified");
        debug!(client, requested, answered = %protocol, "Client initializing");
    }

    let server_info = json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION
    });

    let result = match protocol {
        ProtocolVariant::Legacy => json!({
            "protocolVersion": protocol.version(),
            "capabilities": { "tools": {} },
            "serverInfo": server_info
        }),
        ProtocolVariant::Current => json!({
            "protocolVersion": protocol.version(),
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": server_info,
            "instructions": INSTRUCTIONS
        }),
    };

    Response::success(req.response_id(), result)
}

/// Handles the 'tools/list' request.
fn handle_tools_list(req: &Request) -> Response {
    Response::success(req.response_id(), json!({ "tools": &*TOOL_DESCRIPTORS }))
}

/// Handles a 'tools/call' request by dispatching it to the correct tool logic.
///
/// Each call opens its own `CompletionClient`; it is dropped before the
/// response is returned on every path.
async fn handle_tool_call(req: &Request, state: &AppState) -> Response {
    let req_id = req.response_id();

    let params = match req.params.as_ref().filter(|p| p.is_object()) {
        Some(p) => p,
        None => {
            return Response::error(
                req_id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(Value::as_str) {
        Some(name) => name,
        None => {
            return Response::error(
                req_id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params
        .get("arguments")
        .filter(|a| !a.is_null())
        .unwrap_or(&empty_args);
    let remote = &state.config.remote;

    match tool_name {
        VALIDATE_USD_CODE => {
            let res: Result<Response, Response> = (async {
                let code = utils::get_required_arg::<String>(args, "code", &req_id)?;
                let context = utils::get_optional_str(args, "context");

                let client = CompletionClient::connect(remote)
                    .map_err(|e| tool_failure(&req_id, tool_name, e))?;
                let report = services::validate_usd_code(&client, &code, context)
                    .await
                    .map_err(|e| tool_failure(&req_id, tool_name, e))?;

                let text = serde_json::to_string_pretty(&report)
                    .map_err(|e| tool_failure(&req_id, tool_name, e))?;
                let payload = serde_json::to_value(&report)
                    .map_err(|e| tool_failure(&req_id, tool_name, e))?;
                Ok(Response::success(
                    req_id.clone(),
                    utils::make_texty_result(text, payload),
                ))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        GENERATE_USD_CODE => {
            let res: Result<Response, Response> = (async {
                let prompt = utils::get_required_arg::<String>(args, "prompt", &req_id)?;
                let context = utils::get_optional_str(args, "context");

                let client = CompletionClient::connect(remote)
                    .map_err(|e| tool_failure(&req_id, tool_name, e))?;
                let code = services::generate_usd_code(&client, &prompt, context)
                    .await
                    .map_err(|e| tool_failure(&req_id, tool_name, e))?;

                Ok(Response::success(
                    req_id.clone(),
                    json!({ "content": utils::text_content(code) }),
                ))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        other => Response::error(
            req_id,
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown tool: {}", other),
        ),
    }
}

fn tool_failure(req_id: &Value, tool: &str, err: impl Display) -> Response {
    error!(tool, error = %err, "Tool call failed");
    Response::error(req_id.clone(), error_codes::INTERNAL_ERROR, err.to_string())
}
