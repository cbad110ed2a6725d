//! Crate-level error type for the review pipeline.
//!
//! Completion-collaborator failures never appear here: they are converted to
//! deterministic fallback content at the point of use. Only source-control
//! failures (and genuinely unexpected conditions) abort a run.

use thiserror::Error;

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, ReviewError>;

/// Errors that abort a whole review run.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Fetching PR metadata, diff, or file list failed.
    #[error(transparent)]
    SourceControl(#[from] github_client::GitHubClientError),

    /// Catch-all for unexpected pipeline conditions.
    #[error("review pipeline error: {0}")]
    Internal(String),
}
