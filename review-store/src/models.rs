//! Persisted row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Lifecycle state of a review request.
///
/// `pending → processing → {completed, failed}`; a `failed` request may be
/// re-run (back through `processing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ReviewStatus {
    /// Database/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Processing => "processing",
            ReviewStatus::Completed => "completed",
            ReviewStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "processing" => Ok(ReviewStatus::Processing),
            "completed" => Ok(ReviewStatus::Completed),
            "failed" => Ok(ReviewStatus::Failed),
            other => Err(StoreError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One review request row; the unit of mutual exclusion for runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub id: i64,
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub status: ReviewStatus,
    /// Identifier of the background task driving the run, when async.
    pub task_id: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Completed review payload to persist alongside the `completed` transition.
#[derive(Debug, Clone)]
pub struct NewReviewResult {
    pub pr_details: serde_json::Value,
    pub overall_review: String,
    pub file_reviews: serde_json::Value,
    pub summary: String,
    pub quality_score: Option<i32>,
}

/// Stored review result; exactly one per completed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReviewResult {
    pub id: i64,
    pub review_request_id: i64,
    pub pr_details: serde_json::Value,
    pub overall_review: String,
    pub file_reviews: serde_json::Value,
    pub summary: String,
    pub quality_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Upsert payload for the repository cache.
#[derive(Debug, Clone)]
pub struct RepositoryUpsert {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub open_issues_count: u32,
    pub private: bool,
}

/// Upsert payload for the pull request cache.
#[derive(Debug, Clone)]
pub struct PullRequestUpsert {
    pub repository_id: i64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub user_login: String,
    pub html_url: String,
    pub additions: Option<u32>,
    pub deletions: Option<u32>,
    pub changed_files: Option<u32>,
    pub draft: bool,
}

/// Cached mirror of a remote repository; the remote stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRepository {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub open_issues_count: u32,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cached mirror of a pull request, refreshed on each details fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPullRequest {
    pub id: i64,
    pub repository_id: i64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub user_login: String,
    pub html_url: String,
    pub additions: Option<u32>,
    pub deletions: Option<u32>,
    pub changed_files: Option<u32>,
    pub draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ReviewStatus::Pending,
            ReviewStatus::Processing,
            ReviewStatus::Completed,
            ReviewStatus::Failed,
        ] {
            assert_eq!(ReviewStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(ReviewStatus::from_str("bogus").is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::Processing).unwrap(),
            "\"processing\""
        );
    }
}
