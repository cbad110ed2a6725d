//! Result types produced by the review pipeline.

use github_client::PrDetails;
use serde::{Deserialize, Serialize};

/// Added/removed line counts for one file, as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub additions: u32,
    pub deletions: u32,
}

/// Review output for a single changed file.
///
/// Always complete: when analysis or improvement generation fails the
/// corresponding fields hold deterministic fallback or placeholder text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReviewRecord {
    pub file: String,
    pub language: String,
    pub old_code: String,
    pub new_code: String,
    /// Line-annotated change summary from the diff parser.
    pub code_changes: String,
    pub analysis: String,
    pub improvements: String,
    pub changes: ChangeCounts,
}

/// Full outcome of one review run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub pr_details: PrDetails,
    pub overall_review: String,
    pub file_reviews: Vec<FileReviewRecord>,
    pub summary: String,
    /// Parsed from the overall review text; `None` when absent.
    pub quality_score: Option<i32>,
}
