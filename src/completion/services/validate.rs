// src/completion/services/validate.rs

use tracing::{info, warn};

use crate::completion::{
    client::CompletionClient, error::CompletionError, models::ValidationReport, prompts,
};

pub const VALIDATION_TEMPERATURE: f32 = 0.3;

/// Asks the model to review `code` and interprets its answer as a report.
///
/// Non-JSON answers degrade to a passing report carrying the raw text.
pub async fn validate_usd_code(
    client: &CompletionClient<'_>,
    code: &str,
    context: Option<&str>,
) -> Result<ValidationReport, CompletionError> {
    let messages = prompts::validation_messages(code, context);
    let response = client
        .complete(&messages, VALIDATION_TEMPERATURE, None)
        .await?;

    let report = match response.first_content() {
        Some(text) => ValidationReport::from_completion(&text),
        None => {
            warn!("NIM API returned no choices for validation");
            ValidationReport::unavailable()
        }
    };

    info!(
        valid = report.valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "USD code validated"
    );
    Ok(report)
}
