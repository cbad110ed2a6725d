use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiErrorDetail},
    error_handler::AppError,
    review_runner::trigger_review,
    routes::review::{quick_review_request::QuickReviewRequest, review_response::respond_to_outcome},
};

lazy_static! {
    /// Exact PR URL shape; anything else (issues, gitlab, extra path
    /// segments) is rejected before any network traffic.
    static ref PR_URL: Regex =
        Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/pull/(\d+)$").unwrap();
}

/// Parses `https://github.com/<owner>/<repo>/pull/<number>`.
pub(crate) fn parse_pr_url(url: &str) -> Option<(String, String, u64)> {
    let caps = PR_URL.captures(url.trim())?;
    let number: u64 = caps[3].parse().ok()?;
    Some((caps[1].to_string(), caps[2].to_string(), number))
}

/// HTTP endpoint for triggering a PR review from a GitHub PR URL.
///
/// Validates the URL shape, then delegates to the same flow as the
/// triple-based trigger.
#[instrument(name = "quick_review_route", skip(state, body))]
pub async fn quick_review_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuickReviewRequest>,
) -> Response {
    let Some((owner, repo, pr_number)) = parse_pr_url(&body.github_url) else {
        let details = vec![ApiErrorDetail {
            path: Some("github_url".into()),
            hint: Some("expected https://github.com/<owner>/<repo>/pull/<number>".into()),
        }];
        return AppError::Validation {
            message: "Invalid GitHub pull request URL".into(),
            details,
        }
        .into_response();
    };

    info!(%owner, %repo, pr_number, "quick review trigger received");

    let result = trigger_review(
        (*state).clone(),
        owner,
        repo,
        pr_number,
        body.async_review,
        false,
    )
    .await;

    match result {
        Ok(outcome) => respond_to_outcome(outcome),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_pr_url;

    #[test]
    fn accepts_the_exact_pr_url_shape() {
        assert_eq!(
            parse_pr_url("https://github.com/acme/widgets/pull/42"),
            Some(("acme".into(), "widgets".into(), 42))
        );
        // Surrounding whitespace is tolerated.
        assert_eq!(
            parse_pr_url("  https://github.com/a/b/pull/1 "),
            Some(("a".into(), "b".into(), 1))
        );
    }

    #[test]
    fn rejects_other_hosts_and_resources() {
        assert!(parse_pr_url("https://gitlab.com/acme/widgets/pull/42").is_none());
        assert!(parse_pr_url("https://github.com/acme/widgets/issues/42").is_none());
        assert!(parse_pr_url("http://github.com/acme/widgets/pull/42").is_none());
    }

    #[test]
    fn rejects_extra_segments_and_non_numeric_numbers() {
        assert!(parse_pr_url("https://github.com/acme/widgets/pull/42/files").is_none());
        assert!(parse_pr_url("https://github.com/acme/widgets/pull/latest").is_none());
        assert!(parse_pr_url("https://github.com/acme/pull/42").is_none());
        assert!(parse_pr_url("").is_none());
    }
}
