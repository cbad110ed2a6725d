//! Response DTOs shared by the review trigger and status routes.

use axum::{http::StatusCode, response::Response};
use chrono::{DateTime, Utc};
use review_store::{ReviewRequest, ReviewStatus, StoredReviewResult};
use serde::Serialize;

use crate::core::http::response_envelope::ApiResponse;
use crate::review_runner::TriggerOutcome;

/// One review request with its result when completed.
#[derive(Debug, Serialize)]
pub struct ReviewStatusView {
    pub review_id: i64,
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReviewResultView>,
}

/// Stored result payload.
#[derive(Debug, Serialize)]
pub struct ReviewResultView {
    pub pr_details: serde_json::Value,
    pub overall_review: String,
    pub file_reviews: serde_json::Value,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Immediate reply for a background run.
#[derive(Debug, Serialize)]
pub struct AcceptedReviewView {
    pub review_id: i64,
    pub status: ReviewStatus,
    pub task_id: String,
}

impl ReviewStatusView {
    pub fn from_row(request: ReviewRequest, result: Option<StoredReviewResult>) -> Self {
        Self {
            review_id: request.id,
            owner: request.owner,
            repo: request.repo,
            pr_number: request.pr_number,
            status: request.status,
            task_id: request.task_id,
            error_message: request.error_message,
            created_at: request.created_at,
            updated_at: request.updated_at,
            result: result.map(ReviewResultView::from_row),
        }
    }
}

impl ReviewResultView {
    pub fn from_row(result: StoredReviewResult) -> Self {
        Self {
            pr_details: result.pr_details,
            overall_review: result.overall_review,
            file_reviews: result.file_reviews,
            summary: result.summary,
            quality_score: result.quality_score,
            created_at: result.created_at,
        }
    }
}

/// Maps a trigger outcome to its HTTP reply.
pub fn respond_to_outcome(outcome: TriggerOutcome) -> Response {
    match outcome {
        TriggerOutcome::AlreadyCompleted { request, result } => ApiResponse::success_with_message(
            "Review already completed",
            ReviewStatusView::from_row(request, Some(result)),
        )
        .into_response_with_status(StatusCode::OK),

        TriggerOutcome::AlreadyProcessing { request } => ApiResponse::success_with_message(
            "Review is already being processed",
            ReviewStatusView::from_row(request, None),
        )
        .into_response_with_status(StatusCode::ACCEPTED),

        TriggerOutcome::Accepted { request, task_id } => ApiResponse::success_with_message(
            "Review started",
            AcceptedReviewView {
                review_id: request.id,
                status: request.status,
                task_id,
            },
        )
        .into_response_with_status(StatusCode::ACCEPTED),

        TriggerOutcome::Completed { request, result } => {
            ApiResponse::success(ReviewStatusView::from_row(request, Some(result)))
                .into_response_with_status(StatusCode::OK)
        }
    }
}
