//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Renders a domain error as `{"error": code, "message": text}`.
///
/// Server-side failures are logged here so handlers do not have to.
pub(crate) fn error_response(status_code: u16, code: &'static str, message: &str) -> Response {
    let status =
        StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(code, message, "request failed");
    }
    (
        status,
        Json(json!({
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}
