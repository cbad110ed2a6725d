//! GitHub REST v3 client used by the review pipeline.
//!
//! Endpoints used:
//!   * GET /user/repos
//!   * GET /repos/{owner}/{repo}/pulls
//!   * GET /repos/{owner}/{repo}/pulls/{number}
//!   * GET /repos/{owner}/{repo}/pulls/{number}           (diff media type)
//!   * GET /repos/{owner}/{repo}/pulls/{number}/files
//!
//! Transient transport failures (connect errors, timeouts) are retried
//! immediately up to a bounded count; any non-2xx status is fatal for that
//! call and mapped to a typed error.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::{GitHubConfigError, GitHubResult, map_status};
use crate::types::{PrDetails, PrFile, PrState, RepoSummary};

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
const ACCEPT_DIFF: &str = "application/vnd.github.v3.diff";

/// Construction-time configuration for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// API base, e.g. "https://api.github.com".
    pub base_api: String,
    /// Bearer credential ("token <PAT>" payload), decrypted by the caller
    /// just before construction. The client owns it for its own lifetime only.
    pub token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How many immediate retries a transient transport failure gets.
    pub max_retries: u32,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_api: "https://api.github.com".into(),
            token: String::new(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    token: String,
    max_retries: u32,
}

impl GitHubClient {
    /// Constructs a client, validating token and base URL up front so the
    /// component is never partially usable.
    pub fn new(cfg: GitHubClientConfig) -> GitHubResult<Self> {
        if cfg.token.trim().is_empty() {
            return Err(GitHubConfigError::MissingToken.into());
        }

        let base = cfg.base_api.trim().trim_end_matches('/').to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(GitHubConfigError::InvalidBaseUrl(cfg.base_api).into());
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        debug!("Creating GitHubClient with base_api={}", base);
        Ok(Self {
            http,
            base_api: base,
            token: cfg.token,
            max_retries: cfg.max_retries,
        })
    }

    /// Lists the authenticated user's repositories (paged, most recently
    /// updated first).
    pub async fn list_user_repositories(
        &self,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Vec<RepoSummary>> {
        let url = format!("{}/user/repos", self.base_api);
        let query = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("sort", "updated".into()),
            ("type", "all".into()),
        ];
        self.get_json(&url, &query).await
    }

    /// Lists pull requests for a repository, filtered by state (paged,
    /// most recently updated first).
    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: PrState,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Vec<PrDetails>> {
        let url = format!("{}/repos/{}/{}/pulls", self.base_api, owner, repo);
        let query = [
            ("state", state.as_query().to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("sort", "updated".into()),
            ("direction", "desc".into()),
        ];
        self.get_json(&url, &query).await
    }

    /// Fetches metadata for one pull request.
    pub async fn get_pr_details(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> GitHubResult<PrDetails> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, owner, repo, pr_number
        );
        self.get_json(&url, &[]).await
    }

    /// Fetches the unified diff of a pull request as raw text.
    pub async fn get_pr_diff(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> GitHubResult<String> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, owner, repo, pr_number
        );
        debug!("GitHub get_pr_diff: {}", url);

        let resp = self.execute_get(&url, &[], ACCEPT_DIFF).await?;
        Ok(resp.text().await?)
    }

    /// Fetches the changed-file list of a pull request.
    pub async fn get_pr_files(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> GitHubResult<Vec<PrFile>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files",
            self.base_api, owner, repo, pr_number
        );
        self.get_json(&url, &[]).await
    }

    /// GET + JSON decode with the standard media type.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> GitHubResult<T> {
        debug!("GitHub GET {}", url);
        let resp = self.execute_get(url, query, ACCEPT_JSON).await?;
        Ok(resp.json().await?)
    }

    /// Sends a GET request, retrying transient transport failures
    /// immediately up to `max_retries`. Non-2xx statuses are mapped to
    /// typed errors without retry.
    async fn execute_get(
        &self,
        url: &str,
        query: &[(&str, String)],
        accept: &str,
    ) -> GitHubResult<reqwest::Response> {
        let mut attempt: u32 = 0;
        loop {
            let result = self
                .http
                .get(url)
                .query(query)
                .header("Authorization", format!("token {}", self.token))
                .header("Accept", accept)
                .send()
                .await;

            let resp = match result {
                Ok(r) => r,
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        url,
                        attempt,
                        max_retries = self.max_retries,
                        "transient transport failure, retrying: {e}"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = resp.status();
            if !status.is_success() {
                let retry_after = resp
                    .headers()
                    .get("Retry-After")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse().ok());
                return Err(map_status(status.as_u16(), retry_after).into());
            }

            return Ok(resp);
        }
    }
}

/// Connection errors and timeouts are worth an immediate retry; everything
/// else (including decode and status errors) is not.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitHubClientError;

    fn cfg(token: &str, base: &str) -> GitHubClientConfig {
        GitHubClientConfig {
            base_api: base.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_token_is_a_construction_error() {
        let err = GitHubClient::new(cfg("", "https://api.github.com")).unwrap_err();
        assert!(matches!(
            err,
            GitHubClientError::Config(GitHubConfigError::MissingToken)
        ));
    }

    #[test]
    fn bad_base_url_is_a_construction_error() {
        let err = GitHubClient::new(cfg("tok", "api.github.com")).unwrap_err();
        assert!(matches!(
            err,
            GitHubClientError::Config(GitHubConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = GitHubClient::new(cfg("tok", "https://api.github.com/")).unwrap();
        assert_eq!(client.base_api, "https://api.github.com");
    }
}
