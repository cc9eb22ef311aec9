//! Shop setting routes, currently the default settlement account.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shearbook_core::ledger::LedgerError;
use shearbook_db::SettingRepository;

use crate::{AppState, error::error_response};

/// Creates the setting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounting/default-settlement-bank-account",
            get(get_default_settlement_account),
        )
        .route(
            "/accounting/default-settlement-bank-account",
            post(set_default_settlement_account),
        )
}

/// Request body for setting the default settlement account.
///
/// A null or omitted account clears the default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDefaultSettlementAccountBody {
    /// The account card-reader settlements are booked against.
    pub bank_account_id: Option<Uuid>,
}

/// The configured default settlement account, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSettlementAccountResponse {
    /// The configured account id, null when unset.
    pub bank_account_id: Option<Uuid>,
}

fn ledger_error(err: &LedgerError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/accounting/default-settlement-bank-account` - Read the default.
///
/// The id is resolved against the bank accounts table, so a default
/// pointing at a deleted account reads as unset.
async fn get_default_settlement_account(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SettingRepository::new((*state.db).clone());

    match repo.default_settlement_account().await {
        Ok(account) => {
            let response = DefaultSettlementAccountResponse {
                bank_account_id: account.map(|a| a.id),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/accounting/default-settlement-bank-account` - Set or clear it.
async fn set_default_settlement_account(
    State(state): State<AppState>,
    payload: Option<Json<SetDefaultSettlementAccountBody>>,
) -> impl IntoResponse {
    let repo = SettingRepository::new((*state.db).clone());
    let body = payload.map(|Json(body)| body).unwrap_or_default();

    match repo.set_default_settlement_account(body.bank_account_id).await {
        Ok(()) => {
            info!(
                bank_account_id = ?body.bank_account_id,
                "Default settlement account updated"
            );
            let response = DefaultSettlementAccountResponse {
                bank_account_id: body.bank_account_id,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}
