//! Runtime configuration
//!
//! One required credential (GEMINI_API_KEY) sourced from the process
//! environment or a local .env file. Absence is a fatal startup error.

use crate::error::AssistantError;
use std::env;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    /// Model identifier, overridable via GEMINI_MODEL.
    pub model: String,
}

impl Config {
    /// Load configuration from the environment. The caller is expected to
    /// have run `dotenv::dotenv().ok()` beforehand.
    pub fn from_env() -> crate::Result<Self> {
        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();

        if api_key.is_empty() || api_key == "your_gemini_api_key_here" {
            return Err(AssistantError::Config(
                "GEMINI_API_KEY not configured. Set it in your environment or .env file."
                    .to_string(),
            ));
        }

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self { api_key, model })
    }
}
