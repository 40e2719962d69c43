// src/main.rs

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usd_nim_mcp::{
    cli::{Cli, Command},
    commands::{self, ReportSummary},
    config::Config,
    mcp::session,
    AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries protocol lines only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usd_nim_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env(cli.remote.into()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        endpoint = %config.remote.endpoint,
        model = %config.remote.model,
        protocol = %config.protocol,
        credential = config.remote.api_key.is_some(),
        "Configuration loaded"
    );

    let state = AppState::new(config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => match session::run_stdio(&state).await {
            Ok(()) => {
                info!("MCP server shutting down");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("MCP session ended abnormally: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Validate { file, context } => {
            match commands::validate_file(&state, &file, context.as_deref()).await {
                Ok(report) => {
                    println!("{}", ReportSummary(&report));
                    if report.passed() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    }
                }
                Err(e) => {
                    eprintln!("ERROR: {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Generate { prompt, context } => {
            match commands::generate(&state, &prompt.join(" "), context.as_deref()).await {
                Ok(code) => {
                    println!("{}", code);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::SelfTest => match commands::self_test(&state).await {
            Ok(report) => match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
