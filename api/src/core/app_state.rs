use std::path::PathBuf;
use std::sync::Arc;

use github_client::{GitHubClient, GitHubClientConfig, GitHubClientError};
use llm_service::{CompletionError, CompletionService, LlmModelConfig};
use pr_reviewer::{PromptCatalog, ReviewLimits};
use review_store::{Database, StoreError};
use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error(transparent)]
    GitHub(#[from] GitHubClientError),

    #[error(transparent)]
    Llm(#[from] CompletionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub github: GitHubClient,
    pub completion: Arc<CompletionService>,
    pub catalog: Arc<PromptCatalog>,
    pub limits: ReviewLimits,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// Both collaborators validate their configuration at construction so
    /// the server never starts partially usable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("GITHUB_TOKEN")
            .map_err(|_| ConfigError::MissingEnv("GITHUB_TOKEN"))?;
        let base_api = std::env::var("GITHUB_API_BASE")
            .unwrap_or_else(|_| "https://api.github.com".into());
        let github = GitHubClient::new(GitHubClientConfig {
            base_api,
            token,
            ..Default::default()
        })?;

        let completion = Arc::new(CompletionService::new(LlmModelConfig::from_env()?)?);
        let catalog = Arc::new(PromptCatalog::from_env());

        let db_path = std::env::var("REVIEW_DB_PATH")
            .unwrap_or_else(|_| "data/reviews.sqlite".into());
        let db = Arc::new(Database::open_at(PathBuf::from(db_path))?);

        Ok(Self {
            db,
            github,
            completion,
            catalog,
            limits: ReviewLimits::default(),
        })
    }
}
