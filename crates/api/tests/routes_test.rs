//! Router-level tests that run without a database.
//!
//! The health probe and extractor rejections resolve before any
//! handler touches the connection, so a disconnected state is enough.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use shearbook_api::{AppState, create_router};

fn test_state() -> AppState {
    AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        shop_tz: "Asia/Tehran".parse().expect("valid timezone"),
    }
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_readiness_reports_unavailable_without_database() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health/ready")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["status"], "unavailable");
}

#[rstest]
#[case::unknown_route("GET", "/api/v1/accounting/nope", StatusCode::NOT_FOUND)]
#[case::settle_outside_prefix("POST", "/appointments/settle", StatusCode::NOT_FOUND)]
#[case::malformed_appointment_id(
    "POST",
    "/api/v1/appointments/not-a-uuid/cancel-settled",
    StatusCode::BAD_REQUEST
)]
#[case::unknown_withdrawal_status(
    "GET",
    "/api/v1/accounting/barber-withdrawals?status=bogus",
    StatusCode::BAD_REQUEST
)]
#[case::unknown_category_type(
    "GET",
    "/api/v1/accounting/categories?type=revenue",
    StatusCode::BAD_REQUEST
)]
#[tokio::test]
async fn test_requests_rejected_before_any_handler_runs(
    #[case] method: &str,
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_missing_body_field_is_unprocessable() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/accounting/bank-accounts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "Melli"}"#))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
