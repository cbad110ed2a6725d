//! Configuration for the completion model invocation.

use crate::errors::{CompletionError, Result};

/// Configuration for a completion model invocation.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-4o-mini"`).
/// - `endpoint`: API base URL (e.g., `"https://api.openai.com"`).
/// - `api_key`: Bearer key for the API.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Loads the configuration from environment variables.
    ///
    /// - `LLM_MODEL` (default `"gpt-4o-mini"`)
    /// - `LLM_ENDPOINT` (default `"https://api.openai.com"`)
    /// - `LLM_API_KEY` (required)
    /// - `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional numerics)
    pub fn from_env() -> Result<Self> {
        let api_key = match std::env::var("LLM_API_KEY") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => return Err(CompletionError::MissingVar("LLM_API_KEY")),
        };

        Ok(Self {
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            endpoint: std::env::var("LLM_ENDPOINT")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            api_key: Some(api_key),
            max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
        })
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            v.parse::<u32>()
                .map(Some)
                .map_err(|_| CompletionError::InvalidNumber {
                    var: name,
                    reason: "expected u32",
                })
        }
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            v.parse::<u64>()
                .map(Some)
                .map_err(|_| CompletionError::InvalidNumber {
                    var: name,
                    reason: "expected u64",
                })
        }
        _ => Ok(None),
    }
}
