use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use review_store::ReviewStatus;
use tracing::instrument;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::review::review_response::ReviewStatusView,
};

/// HTTP endpoint for fetching one review: the full result when completed,
/// the bare request row otherwise.
#[instrument(name = "get_review_route", skip(state))]
pub async fn get_review_route(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match load_review(&state, id) {
        Ok(view) => ApiResponse::success(view).into_response_with_status(StatusCode::OK),
        Err(err) => err.into_response(),
    }
}

fn load_review(state: &AppState, id: i64) -> AppResult<ReviewStatusView> {
    let request = state
        .db
        .review_requests()
        .find(id)?
        .ok_or_else(|| AppError::NotFound(format!("review request {id} not found")))?;

    let result = if request.status == ReviewStatus::Completed {
        state.db.review_results().find_by_request(id)?
    } else {
        None
    };
    Ok(ReviewStatusView::from_row(request, result))
}
