use serde::Deserialize;

/// Request body for triggering a PR review from a GitHub PR URL.
#[derive(Debug, Deserialize)]
pub struct QuickReviewRequest {
    /// Must be exactly `https://github.com/<owner>/<repo>/pull/<number>`.
    pub github_url: String,
    /// Run the pipeline in the background and reply immediately.
    #[serde(default)]
    pub async_review: bool,
}
