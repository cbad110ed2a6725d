use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppError,
};

/// HTTP endpoint for deleting a review request; its stored result goes with
/// it via cascade.
#[instrument(name = "delete_review_route", skip(state))]
pub async fn delete_review_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.db.review_requests().delete(id) {
        Ok(true) => {
            info!(id, "review deleted");
            ApiResponse::success_with_message("Review deleted", json!({ "review_id": id }))
                .into_response_with_status(StatusCode::OK)
        }
        Ok(false) => {
            AppError::NotFound(format!("review request {id} not found")).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}
