//! SQLite persistence for review requests, results, and cache mirrors.
//!
//! `review_requests` rows carry the state machine
//! (`pending → processing → {completed, failed}`) and are the unit of
//! mutual exclusion for runs; `review_results` holds exactly one payload
//! per completed request and is written only inside the completing
//! transaction.

pub mod database;
pub mod errors;
pub mod models;
pub mod repository;

pub use database::{Database, DbConn};
pub use errors::{StoreError, StoreResult};
pub use models::{
    CachedPullRequest, CachedRepository, NewReviewResult, PullRequestUpsert, RepositoryUpsert,
    ReviewRequest, ReviewStatus, StoredReviewResult,
};
pub use repository::{CacheRepository, ReviewRequestRepository, ReviewResultRepository};
