//! Unified error handling for `llm-service`.
//!
//! One top-level [`CompletionError`] covers the whole crate. Callers of the
//! completion collaborator never retry these errors; the review pipeline
//! converts every failure into deterministic fallback content at the point
//! of use. All messages carry the `[LLM Service]` suffix to simplify
//! attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Errors produced by the completion collaborator.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing API key at construction time.
    #[error("[LLM Service] missing api key")]
    MissingApiKey,

    /// Invalid endpoint (empty or missing http/https).
    #[error("[LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Model name was empty.
    #[error("[LLM Service] model name must not be empty")]
    EmptyModel,

    /// Transport/HTTP client error.
    #[error("[LLM Service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("[LLM Service] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("[LLM Service] failed to decode response: {0}")]
    Decode(String),

    /// The API returned an empty `choices` array.
    #[error("[LLM Service] response contained no choices")]
    EmptyChoices,

    /// Required environment variable is missing or empty.
    #[error("[LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A numeric environment variable failed to parse.
    #[error("[LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },
}

/// Trims a response body down to a log-friendly snippet.
pub(crate) fn make_snippet(text: &str) -> String {
    text.chars().take(240).collect()
}
