pub mod routes;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Status and metrics endpoints
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/healthz", get(routes::health))
        .route("/readyz", get(routes::readyz))
        .route("/metrics", get(routes::metrics))
        // Detection endpoint
        .route("/detect", post(routes::detect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
