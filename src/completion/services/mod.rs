// src/completion/services/mod.rs

pub mod generate;
pub mod validate;

pub use generate::{generate_usd_code, GENERATION_TEMPERATURE};
pub use validate::{validate_usd_code, VALIDATION_TEMPERATURE};
