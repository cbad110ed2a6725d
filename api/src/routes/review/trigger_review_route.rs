use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiErrorDetail},
    error_handler::AppError,
    review_runner::trigger_review,
    routes::review::{
        review_response::respond_to_outcome, trigger_review_request::TriggerReviewRequest,
    },
};

/// HTTP endpoint for triggering a PR review by `(owner, repo, pr_number)`.
///
/// A completed identity returns the stored result without re-running unless
/// `force` is set; an in-flight identity is never run twice. With
/// `async_review` the pipeline runs in the background and the reply carries
/// the review id and task id for polling.
#[instrument(name = "trigger_review_route", skip(state, body))]
pub async fn trigger_review_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TriggerReviewRequest>,
) -> Response {
    let mut details = Vec::new();
    if body.owner.trim().is_empty() {
        details.push(ApiErrorDetail {
            path: Some("owner".into()),
            hint: Some("must not be empty".into()),
        });
    }
    if body.repo.trim().is_empty() {
        details.push(ApiErrorDetail {
            path: Some("repo".into()),
            hint: Some("must not be empty".into()),
        });
    }
    if body.pr_number == 0 {
        details.push(ApiErrorDetail {
            path: Some("pr_number".into()),
            hint: Some("must be a positive pull request number".into()),
        });
    }
    if !details.is_empty() {
        return AppError::Validation {
            message: "Invalid review request".into(),
            details,
        }
        .into_response();
    }

    info!(
        owner = %body.owner,
        repo = %body.repo,
        pr_number = body.pr_number,
        async_review = body.async_review,
        force = body.force,
        "review trigger received"
    );

    let result = trigger_review(
        (*state).clone(),
        body.owner.trim().to_string(),
        body.repo.trim().to_string(),
        body.pr_number,
        body.async_review,
        body.force,
    )
    .await;

    match result {
        Ok(outcome) => respond_to_outcome(outcome),
        Err(err) => err.into_response(),
    }
}
