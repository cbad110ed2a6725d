//! Authenticated GitHub REST client for the PR review pipeline.
//!
//! Thin wrapper over the handful of endpoints the review pipeline needs:
//! repository listing, pull request listing/metadata, raw unified diff,
//! and the changed-file list. Transport failures are retried a bounded
//! number of times; API errors are typed and never silently swallowed.

pub mod client;
pub mod errors;
pub mod types;

pub use client::{GitHubClient, GitHubClientConfig};
pub use errors::{GitHubApiError, GitHubClientError, GitHubConfigError, GitHubResult};
pub use types::{PrAuthor, PrDetails, PrFile, PrState, RepoOwner, RepoSummary};
