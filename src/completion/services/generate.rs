// src/completion/services/generate.rs

use tracing::info;

use crate::completion::{client::CompletionClient, error::CompletionError, prompts};

pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Returns the first choice's text verbatim.
pub async fn generate_usd_code(
    client: &CompletionClient<'_>,
    prompt: &str,
    context: Option<&str>,
) -> Result<String, CompletionError> {
    let messages = prompts::generation_messages(prompt, context);
    let response = client
        .complete(&messages, GENERATION_TEMPERATURE, None)
        .await?;

    let code = response.first_content().ok_or(CompletionError::NoChoices)?;
    info!(chars = code.len(), "USD code generated");
    Ok(code)
}
