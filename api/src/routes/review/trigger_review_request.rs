use serde::Deserialize;

/// Request body for triggering a PR review by identity tuple.
#[derive(Debug, Deserialize)]
pub struct TriggerReviewRequest {
    /// Repository owner (user or organization login).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub pr_number: u64,
    /// Run the pipeline in the background and reply immediately.
    #[serde(default)]
    pub async_review: bool,
    /// Re-run even when a completed result already exists.
    #[serde(default)]
    pub force: bool,
}
