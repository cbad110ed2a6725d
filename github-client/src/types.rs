//! Wire types for the GitHub REST v3 endpoints used by the review pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pull request state filter for list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
    All,
}

impl PrState {
    /// Query-string value GitHub expects for the `state` parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            PrState::Open => "open",
            PrState::Closed => "closed",
            PrState::All => "all",
        }
    }
}

/// Repository owner (subset of the GitHub user object).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// One repository row from `GET /user/repos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub private: bool,
}

/// Author of a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrAuthor {
    pub login: String,
}

/// Pull request metadata from `GET /repos/{owner}/{repo}/pulls/{number}`.
///
/// The list endpoint returns the same shape minus the diff-stat fields,
/// which is why `additions`/`deletions`/`changed_files` are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrDetails {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: String,
    pub user: PrAuthor,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub additions: Option<u32>,
    #[serde(default)]
    pub deletions: Option<u32>,
    #[serde(default)]
    pub changed_files: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One changed file from `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    /// "added" | "removed" | "modified" | "renamed" | ...
    pub status: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub patch: Option<String>,
}

impl PrFile {
    /// True when the file was deleted in this pull request.
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}
