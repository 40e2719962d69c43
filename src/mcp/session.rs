//! MCP session loop over a line-delimited stdio transport.
//!
//! One line is read, dispatched and answered before the next is read.
//! Notifications are handled silently; every other line gets exactly one
//! response line, written whole and flushed.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::{
    handler::handle_mcp_request,
    protocol::{error_codes, Request, Response},
};
use crate::AppState;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read from stdin: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),
}

/// Serves MCP on the process's stdin/stdout until stdin closes.
pub async fn run_stdio(state: &AppState) -> Result<(), SessionError> {
    info!("🚀 Starting MCP server on stdin/stdout...");
    run_session(tokio::io::stdin(), tokio::io::stdout(), state).await
}

/// Runs the read-dispatch-write loop until `reader` reaches end-of-stream.
pub async fn run_session<R, W>(
    reader: R,
    mut writer: W,
    state: &AppState,
) -> Result<(), SessionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(SessionError::Read)?;
        if read == 0 {
            info!("EOF received, shutting down MCP server");
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!("Received: {}", line);

        if let Some(response) = process_line(line, state).await {
            write_response(&mut writer, &response).await?;
        }
    }
}

/// Turns one non-empty input line into the response to send, if any.
pub async fn process_line(line: &str, state: &AppState) -> Option<Response> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(parse_error) => {
            warn!("JSON parse error: {}", parse_error);
            return Some(Response::error(
                Value::Null,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", parse_error),
            ));
        }
    };

    let request = match Request::deserialize(&value) {
        Ok(request) => request,
        Err(shape_error) => {
            warn!("Invalid JSON-RPC envelope: {}", shape_error);
            let id = value.get("id").cloned().unwrap_or(Value::Null);
            return Some(Response::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Invalid Request: {}", shape_error),
            ));
        }
    };

    let is_notification = request.is_notification();
    let id = request.response_id();
    let method = request.method.clone();

    guard_dispatch(handle_mcp_request(request, state), &method, id, is_notification).await
}

/// Runs one dispatch and converts a panic into an internal-error response.
/// A panicking notification still produces nothing.
async fn guard_dispatch<F>(
    dispatch: F,
    method: &str,
    id: Value,
    is_notification: bool,
) -> Option<Response>
where
    F: Future<Output = Option<Response>>,
{
    match AssertUnwindSafe(dispatch).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(method = %method, "Dispatch panicked: {}", message);
            if is_notification {
                None
            } else {
                Some(Response::error(id, error_codes::INTERNAL_ERROR, message))
            }
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> Result<(), SessionError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            // Envelopes hold only serde_json values, so this is not expected.
            error!("Failed to serialize response: {}", e);
            return Ok(());
        }
    };
    debug!("Sending: {}", line);
    line.push('\n');

    writer
        .write_all(line.as_bytes())
        .await
        .map_err(SessionError::Write)?;
    writer.flush().await.map_err(SessionError::Write)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}
