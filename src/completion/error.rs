// src/completion/error.rs

use thiserror::Error;

use crate::config::API_KEY_URL;

/// Classified failures of a single remote completion call.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error(
        "NIM_API_KEY not provided. Set it as environment variable or pass --api-key.\n\
         Get your API key from: {}",
        API_KEY_URL
    )]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("NIM API request timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("NIM API request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// Non-2xx answer. `message` already carries status-specific guidance.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid NIM API response: {0}")]
    InvalidResponse(String),
    #[error("Failed to generate code")]
    NoChoices,
}
