use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use review_store::ReviewStatus;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::review::review_response::ReviewStatusView,
};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListReviewsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Optional status filter: pending/processing/completed/failed.
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewPage {
    pub items: Vec<ReviewStatusView>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// HTTP endpoint for paging through review history, newest first.
#[instrument(name = "list_reviews_route", skip(state))]
pub async fn list_reviews_route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListReviewsQuery>,
) -> Response {
    match load_page(&state, &query) {
        Ok(page) => ApiResponse::success(page).into_response_with_status(StatusCode::OK),
        Err(err) => err.into_response(),
    }
}

fn load_page(state: &AppState, query: &ListReviewsQuery) -> AppResult<ReviewPage> {
    let (page, per_page) = normalize_paging(query.page, query.per_page);

    let status = match &query.status {
        Some(raw) => Some(
            ReviewStatus::from_str(raw)
                .map_err(|_| AppError::BadRequest(format!("invalid status filter: {raw}")))?,
        ),
        None => None,
    };

    let (rows, total) = state.db.review_requests().list(page, per_page, status)?;
    let items = rows
        .into_iter()
        .map(|row| ReviewStatusView::from_row(row, None))
        .collect();

    Ok(ReviewPage {
        items,
        page,
        per_page,
        total,
    })
}

fn normalize_paging(page: Option<u32>, per_page: Option<u32>) -> (u32, u32) {
    (
        page.unwrap_or(1).max(1),
        per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_and_caps() {
        assert_eq!(normalize_paging(None, None), (1, DEFAULT_PER_PAGE));
        assert_eq!(normalize_paging(Some(0), Some(500)), (1, MAX_PER_PAGE));
        assert_eq!(normalize_paging(Some(3), Some(0)), (3, 1));
        assert_eq!(normalize_paging(Some(2), Some(50)), (2, 50));
    }
}
