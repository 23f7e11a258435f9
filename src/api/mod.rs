//! HTTP surface: the unauthenticated health check.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::app_state::AppState;

/// Health check response body.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// `GET /health` — Service health status.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "healthy" }))
}

/// Builds the HTTP routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn health_body_matches_contract() {
        let body = serde_json::to_value(HealthResponse { status: "healthy" }).unwrap_or_default();
        assert_eq!(body, serde_json::json!({"status": "healthy"}));
    }
}
