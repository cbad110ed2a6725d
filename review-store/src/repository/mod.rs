//! Repositories over the shared SQLite connection, one per entity.

mod cache;
mod review_requests;
mod review_results;

#[cfg(test)]
mod tests;

pub use cache::CacheRepository;
pub use review_requests::ReviewRequestRepository;
pub use review_results::ReviewResultRepository;
