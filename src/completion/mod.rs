//! # Completion Module
//!
//! Client side of the remote OpenAI-compatible chat-completion API (NVIDIA NIM)
//! and the two USD services built on top of it.
//!
//! - `client` - one authenticated POST per call, with status classification
//! - `models` - request/response payloads and the validation report
//! - `prompts` - fixed prompt templates
//! - `services` - `validate_usd_code` and `generate_usd_code`

pub mod client;
pub mod error;
pub mod models;
pub mod prompts;
pub mod services;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use models::{ChatMessage, ValidationReport};
