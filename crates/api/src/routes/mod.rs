//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod appointments;
pub mod bank_accounts;
pub mod categories;
pub mod health;
pub mod salaries;
pub mod settings;
pub mod withdrawals;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(appointments::routes())
        .merge(bank_accounts::routes())
        .merge(categories::routes())
        .merge(salaries::routes())
        .merge(settings::routes())
        .merge(withdrawals::routes())
}
