//! Health check endpoints.

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::store::collections;
use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Performs one cheap document read. Returns 503 Service Unavailable if the
/// document store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().get(collections::ADMIN, "_readiness").await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
