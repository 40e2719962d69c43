//! HTTP client for the OpenAI-compatible chat-completion endpoint.
//!
//! A `CompletionClient` is built for one tool call and dropped when the call
//! returns, so its connection pool never outlives the request that opened it.

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::completion::{
    error::CompletionError,
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
};
use crate::config::{RemoteConfig, API_KEY_URL};

pub struct CompletionClient<'a> {
    http: Client,
    remote: &'a RemoteConfig,
    api_key: &'a SecretString,
}

impl<'a> CompletionClient<'a> {
    /// Opens a client for a single call. Fails if no credential is configured.
    pub fn connect(remote: &'a RemoteConfig) -> Result<Self, CompletionError> {
        let api_key = remote
            .api_key
            .as_ref()
            .ok_or(CompletionError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(remote.request_timeout)
            .build()
            .map_err(CompletionError::ClientBuild)?;
        Ok(Self {
            http,
            remote,
            api_key,
        })
    }

    /// Sends one chat-completion request and returns the decoded body.
    ///
    /// `max_tokens` falls back to the configured limit when `None`.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let payload = ChatCompletionRequest {
            model: &self.remote.model,
            messages,
            temperature,
            top_p: 1.0,
            expert_type: "auto",
            max_tokens: max_tokens.or(self.remote.max_tokens),
        };

        debug!(
            endpoint = %self.remote.endpoint,
            model = %self.remote.model,
            temperature,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let resp = self
            .http
            .post(self.remote.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        debug!(status = %status, "NIM API response status");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, "NIM API returned an error status");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: status_message(status, self.remote, &body),
            });
        }

        resp.json::<ChatCompletionResponse>().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                CompletionError::InvalidResponse(e.to_string())
            }
        })
    }

    fn classify(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout {
                secs: self.remote.request_timeout.as_secs(),
            }
        } else {
            CompletionError::Request(err)
        }
    }
}

/// Builds the error text for a non-2xx answer, with hints for the common cases.
fn status_message(status: StatusCode, remote: &RemoteConfig, body: &str) -> String {
    let mut msg = format!("NIM API error: {}", status.as_u16());

    match status {
        StatusCode::NOT_FOUND => msg.push_str(&format!(
            "\n\n404 Not Found - The endpoint URL may be incorrect.\n\
             Current endpoint: {}\n\
             Current model: {}\n\n\
             Troubleshooting:\n\
             1. Verify your API key is correct at: {}\n\
             2. Check if the endpoint URL needs to include the model name\n\
             3. Try setting NIM_ENDPOINT environment variable with the correct endpoint\n\
             4. Check NVIDIA NIM documentation for the correct endpoint format\n\
             5. The endpoint might need to be: \
             https://integrate.api.nvidia.com/v1/nim/{}/chat/completions",
            remote.endpoint, remote.model, API_KEY_URL, remote.model
        )),
        StatusCode::UNAUTHORIZED => msg.push_str(&format!(
            "\n\n401 Unauthorized - API key may be invalid or expired.\n\
             Verify your API key at: {}",
            API_KEY_URL
        )),
        StatusCode::FORBIDDEN => msg.push_str(&format!(
            "\n\n403 Forbidden - API key may not have access to this model.\n\
             Check your API key permissions at: {}",
            API_KEY_URL
        )),
        _ => {}
    }

    // Compact JSON bodies, raw text otherwise
    let detail = serde_json::from_str::<Value>(body)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| body.to_string());
    msg.push_str(&format!("\n\nAPI Response: {}", detail));
    msg
}
