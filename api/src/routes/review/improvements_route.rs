use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct ImprovementsQuery {
    /// When present, return this file's improvements only.
    pub file_path: Option<String>,
}

/// HTTP endpoint for reading improvement suggestions from a completed
/// review.
///
/// Without `file_path` the reply maps every reviewed file to its
/// `{language, improvements, changes}`; with it, just that file's entry.
/// Unknown files and incomplete reviews are 404.
#[instrument(name = "improvements_route", skip(state))]
pub async fn improvements_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<ImprovementsQuery>,
) -> Response {
    match load_improvements(&state, id, query.file_path.as_deref()) {
        Ok(data) => ApiResponse::success(data).into_response_with_status(StatusCode::OK),
        Err(err) => err.into_response(),
    }
}

fn load_improvements(state: &AppState, id: i64, file_path: Option<&str>) -> AppResult<Value> {
    let request = state
        .db
        .review_requests()
        .find(id)?
        .ok_or_else(|| AppError::NotFound(format!("review request {id} not found")))?;

    let result = state
        .db
        .review_results()
        .find_by_request(request.id)?
        .ok_or_else(|| AppError::NotFound(format!("review {id} has no completed result")))?;

    let empty = Vec::new();
    let records = result.file_reviews.as_array().unwrap_or(&empty);

    match file_path {
        Some(path) => {
            let record = records
                .iter()
                .find(|r| r["file"] == path)
                .ok_or_else(|| AppError::NotFound(format!("file {path} not found in review {id}")))?;
            Ok(improvements_entry(record))
        }
        None => {
            let mut all = Map::new();
            for record in records {
                if let Some(file) = record["file"].as_str() {
                    all.insert(file.to_string(), improvements_entry(record));
                }
            }
            Ok(Value::Object(all))
        }
    }
}

fn improvements_entry(record: &Value) -> Value {
    json!({
        "language": record["language"],
        "improvements": record["improvements"],
        "changes": record["changes"],
    })
}
