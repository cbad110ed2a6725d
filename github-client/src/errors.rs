//! Crate-wide error hierarchy for github-client.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitHubResult<T> = Result<T, GitHubClientError>;

/// Root error type for the github-client crate.
#[derive(Debug, Error)]
pub enum GitHubClientError {
    /// GitHub API related failure (HTTP status or transport).
    #[error(transparent)]
    Api(#[from] GitHubApiError),

    /// Configuration problems (bad/missing token, base URL).
    #[error(transparent)]
    Config(#[from] GitHubConfigError),

    /// Unexpected/invalid shape of an API response.
    #[error("invalid api response: {0}")]
    InvalidResponse(String),
}

/// API-call level errors: HTTP status families plus transport failures.
#[derive(Debug, Error)]
pub enum GitHubApiError {
    /// Unauthorized (HTTP 401), bad or expired token.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404), unknown repo or pull request.
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),
}

/// Configuration and setup errors (base API URL, missing token).
#[derive(Debug, Error)]
pub enum GitHubConfigError {
    /// Missing required access token.
    #[error("missing github token")]
    MissingToken,

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),
}

/// Maps an HTTP status code into a typed [`GitHubApiError`].
pub(crate) fn map_status(code: u16, retry_after_secs: Option<u64>) -> GitHubApiError {
    match code {
        401 => GitHubApiError::Unauthorized,
        403 => GitHubApiError::Forbidden,
        404 => GitHubApiError::NotFound,
        429 => GitHubApiError::RateLimited { retry_after_secs },
        500..=599 => GitHubApiError::Server(code),
        _ => GitHubApiError::HttpStatus(code),
    }
}

// ===== Mapping from reqwest::Error for `?` ergonomics =====

impl From<reqwest::Error> for GitHubApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return GitHubApiError::Timeout;
        }

        if let Some(status) = e.status() {
            return map_status(status.as_u16(), None);
        }

        GitHubApiError::Network(e.to_string())
    }
}

impl From<reqwest::Error> for GitHubClientError {
    fn from(e: reqwest::Error) -> Self {
        GitHubClientError::Api(GitHubApiError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_specific_variants() {
        assert!(matches!(map_status(401, None), GitHubApiError::Unauthorized));
        assert!(matches!(map_status(403, None), GitHubApiError::Forbidden));
        assert!(matches!(map_status(404, None), GitHubApiError::NotFound));
        assert!(matches!(
            map_status(429, Some(30)),
            GitHubApiError::RateLimited {
                retry_after_secs: Some(30)
            }
        ));
        assert!(matches!(map_status(502, None), GitHubApiError::Server(502)));
        assert!(matches!(
            map_status(418, None),
            GitHubApiError::HttpStatus(418)
        ));
    }
}
