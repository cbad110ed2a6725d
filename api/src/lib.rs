//! HTTP surface for the PR review backend.
//!
//! Routes, shared state, response envelope, and the runner that drives the
//! review state machine live here; the pipeline itself is `pr-reviewer`.

pub mod core;
pub mod error_handler;
pub mod review_runner;
mod routes;

use std::{env, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::routes::{
    health::health_route::health_route,
    review::{
        improvements_route::improvements_route, quick_review_route::quick_review_route,
        review_status_route::review_status_route, trigger_review_route::trigger_review_route,
    },
    reviews::{
        delete_review_route::delete_review_route, get_review_route::get_review_route,
        list_reviews_route::list_reviews_route,
    },
};

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let state = Arc::new(AppState::from_env()?);

    let app = Router::new()
        .route("/api/review", post(trigger_review_route))
        .route("/api/review/quick", post(quick_review_route))
        .route("/api/review/{id}/status", get(review_status_route))
        .route("/api/review/{id}/improvements", get(improvements_route))
        .route("/api/reviews", get(list_reviews_route))
        .route(
            "/api/reviews/{id}",
            get(get_review_route).delete(delete_review_route),
        )
        .route("/api/health", get(health_route))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!("listening on {host_url}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
