use axum::{http::StatusCode, response::Response};
use chrono::Utc;
use serde::Serialize;

use crate::core::http::response_envelope::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: chrono::DateTime<Utc>,
}

/// Liveness probe.
pub async fn health_route() -> Response {
    ApiResponse::success(HealthView {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
    .into_response_with_status(StatusCode::OK)
}
