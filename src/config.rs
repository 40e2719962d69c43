// src/config.rs

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use secrecy::SecretString;
use tracing::warn;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://integrate.api.nvidia.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "nvidia/usdcode-llama-3.1-70b-instruct";
/// Short model name older setups put in `NIM_MODEL`; the API no longer accepts it.
pub const LEGACY_MODEL_ALIAS: &str = "usdcode";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const API_KEY_URL: &str = "https://build.nvidia.com/nvidia/usdcode";

pub const ENV_API_KEY: &str = "NIM_API_KEY";
pub const ENV_ENDPOINT: &str = "NIM_ENDPOINT";
pub const ENV_MODEL: &str = "NIM_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "NIM_TIMEOUT_SECS";
pub const ENV_MAX_TOKENS: &str = "NIM_MAX_TOKENS";
pub const ENV_PROTOCOL_VERSION: &str = "MCP_PROTOCOL_VERSION";

/// MCP protocol revision the server answers `initialize` with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProtocolVariant {
    /// `2024-11-05`: bare `tools` capability, no instructions.
    #[default]
    Legacy,
    /// `2025-06-18`: `listChanged` flag and server instructions.
    Current,
}

impl ProtocolVariant {
    pub fn version(self) -> &'static str {
        match self {
            ProtocolVariant::Legacy => "2024-11-05",
            ProtocolVariant::Current => "2025-06-18",
        }
    }
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version())
    }
}

impl FromStr for ProtocolVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "2024-11-05" | "legacy" => Ok(ProtocolVariant::Legacy),
            "2025-06-18" | "current" => Ok(ProtocolVariant::Current),
            other => Err(anyhow!(
                "unsupported protocol version '{}' (expected 2024-11-05 or 2025-06-18)",
                other
            )),
        }
    }
}

/// Values given explicitly on the command line. They win over the environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub protocol_version: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
}

/// Everything the completion client needs to reach the remote API.
#[derive(Debug)]
pub struct RemoteConfig {
    /// Bearer credential. Absent keys are reported when a tool is first called.
    pub api_key: Option<SecretString>,
    pub endpoint: Url,
    pub model: String,
    pub request_timeout: Duration,
    pub max_tokens: Option<u32>,
}

// Resolved once at startup and shared read-only afterwards.
#[derive(Debug)]
pub struct Config {
    pub remote: RemoteConfig,
    pub protocol: ProtocolVariant,
}

impl Config {
    /// Loads configuration from `.env`, the process environment and the given overrides.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Resolves every setting as explicit override, then `lookup(VAR)`, then default.
    ///
    /// Blank values count as unset at every level.
    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_blank(lookup(key));

        let api_key = non_blank(overrides.api_key)
            .or_else(|| var(ENV_API_KEY))
            .map(SecretString::new);

        let endpoint_raw = non_blank(overrides.endpoint)
            .or_else(|| var(ENV_ENDPOINT))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint_raw).with_context(|| {
            format!("NIM_ENDPOINT must be an absolute URL, got '{}'", endpoint_raw)
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!("NIM_ENDPOINT must use http or https, got '{}'", endpoint_raw);
        }

        let model = resolve_model(non_blank(overrides.model), var(ENV_MODEL));

        let protocol = match non_blank(overrides.protocol_version)
            .or_else(|| var(ENV_PROTOCOL_VERSION))
        {
            Some(raw) => raw.parse()?,
            None => ProtocolVariant::default(),
        };

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => var(ENV_TIMEOUT_SECS)
                .map(|raw| raw.parse::<u64>())
                .transpose()
                .context("NIM_TIMEOUT_SECS must be a valid number")?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }

        let max_tokens = match overrides.max_tokens {
            Some(n) => Some(n),
            None => var(ENV_MAX_TOKENS)
                .map(|raw| raw.parse::<u32>())
                .transpose()
                .context("NIM_MAX_TOKENS must be a valid number")?,
        };

        Ok(Config {
            remote: RemoteConfig {
                api_key,
                endpoint,
                model,
                request_timeout: Duration::from_secs(timeout_secs),
                max_tokens,
            },
            protocol,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// An explicit model is taken as-is. Only the environment alias is rewritten.
fn resolve_model(explicit: Option<String>, from_env: Option<String>) -> String {
    if let Some(model) = explicit {
        return model;
    }
    match from_env {
        Some(model) if model == LEGACY_MODEL_ALIAS => {
            warn!(
                legacy = LEGACY_MODEL_ALIAS,
                model = DEFAULT_MODEL,
                "NIM_MODEL holds the retired alias; using the full model name instead"
            );
            DEFAULT_MODEL.to_string()
        }
        Some(model) => model,
        None => DEFAULT_MODEL.to_string(),
    }
}
