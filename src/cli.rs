//! Command-line interface definitions.
//!
//! Without a subcommand the binary serves MCP over stdio, which is how MCP
//! hosts launch it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

/// MCP server and CLI for USD code generation and review through NVIDIA NIM.
#[derive(Parser, Debug)]
#[command(name = "usd-nim-mcp", version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub remote: RemoteArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Explicit settings; each one overrides its environment variable.
#[derive(Args, Debug, Default, Clone)]
pub struct RemoteArgs {
    /// NVIDIA NIM API key [env: NIM_API_KEY]
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Chat-completion endpoint URL [env: NIM_ENDPOINT]
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Model identifier [env: NIM_MODEL]
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// MCP protocol revision to answer with: 2024-11-05 or 2025-06-18 [env: MCP_PROTOCOL_VERSION]
    #[arg(long, global = true, value_name = "VERSION")]
    pub protocol_version: Option<String>,

    /// Per-request timeout in seconds [env: NIM_TIMEOUT_SECS]
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Upper bound on generated tokens [env: NIM_MAX_TOKENS]
    #[arg(long, global = true, value_name = "N")]
    pub max_tokens: Option<u32>,
}

impl From<RemoteArgs> for ConfigOverrides {
    fn from(args: RemoteArgs) -> Self {
        ConfigOverrides {
            api_key: args.api_key,
            endpoint: args.endpoint,
            model: args.model,
            protocol_version: args.protocol_version,
            timeout_secs: args.timeout_secs,
            max_tokens: args.max_tokens,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdin/stdout (the default).
    Serve,

    /// Validate a USD Python file. Exits 0 only when it is valid with no errors.
    Validate {
        /// Path to the USD Python file to validate.
        file: PathBuf,

        /// Optional context about what the code does.
        #[arg(long)]
        context: Option<String>,
    },

    /// Generate USD Python code from a description and print it.
    Generate {
        /// Description of the code to generate.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Optional context about the project or requirements.
        #[arg(long)]
        context: Option<String>,
    },

    /// Validate a built-in sample snippet and print the raw report.
    #[command(alias = "test")]
    SelfTest,
}
