// src/lib.rs

use std::sync::Arc;

pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod mcp;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Configuration resolved once at startup
    pub config: Arc<config::Config>,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
