use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use github_client::{GitHubApiError, GitHubClientError};
use pr_reviewer::ReviewError;
use thiserror::Error;

use crate::core::{
    app_state::ConfigError,
    http::response_envelope::{ApiErrorDetail, ApiResponse},
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Pre-flight validation failure with per-field detail.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ApiErrorDetail>,
    },

    #[error("{0}")]
    NotFound(String),

    // --- Lower layers ---
    #[error(transparent)]
    Store(#[from] review_store::StoreError),

    #[error(transparent)]
    Pipeline(#[from] ReviewError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only; surfaced as 500 if they ever reach a handler
            AppError::MissingEnv(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,

            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Pipeline(e) => pipeline_status(e),
        }
    }
}

/// Upstream provider failures keep their HTTP flavor where it is meaningful
/// to the caller; everything else reads as a gateway problem.
fn pipeline_status(e: &ReviewError) -> StatusCode {
    match e {
        ReviewError::SourceControl(GitHubClientError::Api(api)) => match api {
            GitHubApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            GitHubApiError::Forbidden => StatusCode::FORBIDDEN,
            GitHubApiError::NotFound => StatusCode::NOT_FOUND,
            GitHubApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::BAD_GATEWAY,
        },
        ReviewError::SourceControl(_) => StatusCode::BAD_GATEWAY,
        ReviewError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, details) = match self {
            AppError::Validation { message, details } => (message, details),
            other => (other.to_string(), Vec::new()),
        };
        ApiResponse::<()>::error(message, details).into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert common Axum rejections to `AppError`.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
