// src/commands.rs
//
// One-shot CLI commands that share the completion services with the MCP tools.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::completion::{services, CompletionClient, ValidationReport};
use crate::config::API_KEY_URL;
use crate::AppState;

pub const SAMPLE_USD_CODE: &str = r#"
from pxr import Usd, UsdGeom

stage = Usd.Stage.CreateNew("test.usd")
xform = UsdGeom.Xform.Define(stage, "/World")
stage.GetRootLayer().Save()
"#;

const RULE: &str = "======================================================================";

/// Validates the file at `path`. Fails when no credential is configured,
/// the file cannot be read, or the remote call fails.
pub async fn validate_file(
    state: &AppState,
    path: &Path,
    context: Option<&str>,
) -> Result<ValidationReport> {
    ensure_api_key(state)?;

    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    info!(file = %path.display(), "Reading file");
    let code = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    info!("Validating with NVIDIA NIM...");
    let client = CompletionClient::connect(&state.config.remote)?;
    let report = services::validate_usd_code(&client, &code, context)
        .await
        .context("Validation failed")?;
    Ok(report)
}

pub async fn generate(state: &AppState, prompt: &str, context: Option<&str>) -> Result<String> {
    let client = CompletionClient::connect(&state.config.remote)?;
    let code = services::generate_usd_code(&client, prompt, context).await?;
    Ok(code)
}

/// Validates `SAMPLE_USD_CODE` to check credentials and endpoint end to end.
pub async fn self_test(state: &AppState) -> Result<ValidationReport> {
    let client = CompletionClient::connect(&state.config.remote)?;
    let report = services::validate_usd_code(&client, SAMPLE_USD_CODE, None).await?;
    Ok(report)
}

fn ensure_api_key(state: &AppState) -> Result<()> {
    if state.config.remote.api_key.is_none() {
        bail!(
            "NIM_API_KEY environment variable not set.\n\
             Get your API key from: {}\n\
             Set it with: export NIM_API_KEY=your_key_here (Linux/Mac) \
             or set NIM_API_KEY=your_key_here (Windows)",
            API_KEY_URL
        );
    }
    Ok(())
}

/// Human-readable rendering of a report for terminal output.
pub struct ReportSummary<'a>(pub &'a ValidationReport);

impl fmt::Display for ReportSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "NIM VALIDATION RESULTS")?;
        writeln!(f, "{}", RULE)?;

        if report.valid {
            writeln!(f, "✓ Status: VALID")?;
        } else {
            writeln!(f, "✗ Status: INVALID")?;
        }

        write_section(f, "Errors", &report.errors)?;
        write_section(f, "Warnings", &report.warnings)?;
        write_section(f, "Suggestions", &report.suggestions)?;

        let assessment = if report.assessment.is_empty() {
            "No assessment provided"
        } else {
            report.assessment.as_str()
        };
        writeln!(f, "\nAssessment:")?;
        writeln!(f, "  {}", assessment)?;
        writeln!(f, "{}", RULE)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{} ({}):", title, items.len())?;
    for (i, item) in items.iter().enumerate() {
        writeln!(f, "  {}. {}", i + 1, item)?;
    }
    Ok(())
}
