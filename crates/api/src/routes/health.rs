//! Health and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Probe response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

fn probe_response(status: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe; answers without touching the database.
async fn health_check() -> Json<HealthResponse> {
    probe_response("healthy")
}

/// Readiness probe; the service is only useful with Postgres reachable.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, probe_response("ready")).into_response(),
        Err(e) => {
            warn!(error = %e, "Readiness probe could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                probe_response("unavailable"),
            )
                .into_response()
        }
    }
}

/// Creates the health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}
