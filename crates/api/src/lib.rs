//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for settlements, the ledger, and payouts
//! - Shared application state (database handle, shop timezone)
//! - JSON error responses with stable error codes

pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// The shop's local timezone, used wherever a settlement renders
    /// the appointment time into a description.
    pub shop_tz: Tz,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
