//! Completion collaborator for the PR review pipeline.
//!
//! Exposes a single capability: `complete(system_prompt, user_prompt)
//! -> text`, failing with [`CompletionError`]. The orchestration layer
//! depends only on this contract; failures are converted to deterministic
//! fallback content there, never retried here.

pub mod config;
pub mod errors;
pub mod service;

pub use config::LlmModelConfig;
pub use errors::{CompletionError, Result};
pub use service::CompletionService;
