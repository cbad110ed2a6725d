//! Trait seams between the pipeline and its external collaborators.
//!
//! The orchestrator is generic over these two traits so tests can drive it
//! with in-memory stubs. Methods return `impl Future + Send` so per-file
//! work can run inside spawned tasks.

use github_client::{GitHubClient, GitHubResult, PrDetails, PrFile};
use llm_service::{CompletionError, CompletionService};

/// Read-only source-control operations the pipeline needs for one run.
pub trait SourceControl: Send + Sync {
    fn pr_details(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> impl Future<Output = GitHubResult<PrDetails>> + Send;

    fn pr_diff(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> impl Future<Output = GitHubResult<String>> + Send;

    fn pr_files(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> impl Future<Output = GitHubResult<Vec<PrFile>>> + Send;
}

/// Text completion against a system/user prompt pair.
pub trait Completion: Send + Sync + 'static {
    fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

impl SourceControl for GitHubClient {
    async fn pr_details(&self, owner: &str, repo: &str, pr_number: u64) -> GitHubResult<PrDetails> {
        self.get_pr_details(owner, repo, pr_number).await
    }

    async fn pr_diff(&self, owner: &str, repo: &str, pr_number: u64) -> GitHubResult<String> {
        self.get_pr_diff(owner, repo, pr_number).await
    }

    async fn pr_files(&self, owner: &str, repo: &str, pr_number: u64) -> GitHubResult<Vec<PrFile>> {
        self.get_pr_files(owner, repo, pr_number).await
    }
}

impl Completion for CompletionService {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        CompletionService::complete(self, system, user).await
    }
}
