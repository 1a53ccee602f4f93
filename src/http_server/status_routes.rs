//! Status HTTP Routes
//!
//! Unauthenticated host status and liveness endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::status::StatusSnapshot;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create status routes (nested under `/api`)
pub fn status_routes() -> Router<AppState> {
    Router::new().route("/status", get(status_handler))
}

/// Health check route at root level
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn status_handler(State(state): State<AppState>) -> ApiResult<Json<StatusSnapshot>> {
    let reporter = state.status.clone();
    let snapshot = tokio::task::spawn_blocking(move || reporter.snapshot())
        .await
        .map_err(|e| ApiError::Internal(format!("status snapshot failed: {}", e)))?;

    Ok(Json(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
    }
}
