//! Barber balance and withdrawal workflow routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shearbook_core::withdrawal::{WithdrawalError, WithdrawalStatus};
use shearbook_db::WithdrawalRepository;
use shearbook_db::repositories::withdrawal::{
    ApproveWithdrawalInput, RequestWithdrawalInput, UpdateWithdrawalInput,
};

use crate::{
    AppState,
    dto::{FinancialEntryDto, WithdrawalDto, WithdrawalWithPayoutDto},
    error::error_response,
};

/// Creates the withdrawal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounting/barbers/balances", get(barbers_balances))
        .route("/accounting/barber-withdrawals", get(list_withdrawals))
        .route("/accounting/barber-withdrawals", post(request_withdrawal))
        .route(
            "/accounting/barber-withdrawals/{id}/approve",
            patch(approve_withdrawal),
        )
        .route(
            "/accounting/barber-withdrawals/{id}/reject",
            patch(reject_withdrawal),
        )
        .route("/accounting/barber-withdrawals/{id}", put(update_withdrawal))
        .route(
            "/accounting/barber-withdrawals/{id}",
            delete(delete_withdrawal),
        )
}

/// Request body for a new withdrawal request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWithdrawalBody {
    /// The barber drawing down their balance.
    pub barber_id: Uuid,
    /// Requested amount.
    pub amount: Decimal,
    /// Optional note.
    pub description: Option<String>,
}

/// Query parameters for listing withdrawal requests.
#[derive(Debug, Deserialize)]
pub struct ListWithdrawalsQuery {
    /// Filter by request status.
    pub status: Option<WithdrawalStatus>,
}

/// Request body for approving a withdrawal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveWithdrawalBody {
    /// Admin approving the request.
    pub admin_id: Uuid,
    /// Bank account the payout is booked against.
    pub bank_account_id: Option<Uuid>,
}

/// Request body for rejecting a withdrawal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectWithdrawalBody {
    /// Admin rejecting the request.
    pub admin_id: Uuid,
}

/// Request body for updating a withdrawal request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWithdrawalBody {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New bank account on the payout entry.
    pub bank_account_id: Option<Uuid>,
    /// New note.
    pub description: Option<String>,
}

/// Response for an approved withdrawal, the request plus its payout entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedWithdrawalResponse {
    /// The request, now approved.
    pub request: WithdrawalDto,
    /// The expense entry booked for the payout.
    pub entry: FinancialEntryDto,
}

fn withdrawal_error(err: &WithdrawalError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/accounting/barbers/balances` - Derived balance of every barber.
async fn barbers_balances(State(state): State<AppState>) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());

    match repo.barbers_balances().await {
        Ok(balances) => (StatusCode::OK, Json(balances)).into_response(),
        Err(e) => withdrawal_error(&e),
    }
}

/// GET `/accounting/barber-withdrawals` - List requests with payout state.
async fn list_withdrawals(
    State(state): State<AppState>,
    Query(query): Query<ListWithdrawalsQuery>,
) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());

    match repo.list(query.status).await {
        Ok(rows) => {
            let rows: Vec<WithdrawalWithPayoutDto> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => withdrawal_error(&e),
    }
}

/// POST `/accounting/barber-withdrawals` - Request a withdrawal.
async fn request_withdrawal(
    State(state): State<AppState>,
    Json(payload): Json<RequestWithdrawalBody>,
) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let input = RequestWithdrawalInput {
        barber_id: payload.barber_id,
        amount: payload.amount,
        description: payload.description,
    };

    match repo.request(input).await {
        Ok(request) => {
            info!(
                withdrawal_id = %request.id,
                barber_id = %request.barber_id,
                "Withdrawal requested"
            );
            (StatusCode::CREATED, Json(WithdrawalDto::from(request))).into_response()
        }
        Err(e) => withdrawal_error(&e),
    }
}

/// PATCH `/accounting/barber-withdrawals/{id}/approve` - Approve and pay out.
async fn approve_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveWithdrawalBody>,
) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let input = ApproveWithdrawalInput {
        approved_by: payload.admin_id,
        bank_account_id: payload.bank_account_id,
    };

    match repo.approve(id, input).await {
        Ok(approved) => {
            info!(withdrawal_id = %id, "Withdrawal approved");
            let response = ApprovedWithdrawalResponse {
                request: approved.request.into(),
                entry: approved.entry.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => withdrawal_error(&e),
    }
}

/// PATCH `/accounting/barber-withdrawals/{id}/reject` - Reject a request.
async fn reject_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectWithdrawalBody>,
) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());

    match repo.reject(id, payload.admin_id).await {
        Ok(request) => {
            info!(withdrawal_id = %id, "Withdrawal rejected");
            (StatusCode::OK, Json(WithdrawalDto::from(request))).into_response()
        }
        Err(e) => withdrawal_error(&e),
    }
}

/// PUT `/accounting/barber-withdrawals/{id}` - Update a request.
async fn update_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWithdrawalBody>,
) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let input = UpdateWithdrawalInput {
        amount: payload.amount,
        bank_account_id: payload.bank_account_id,
        description: payload.description,
    };

    match repo.update(id, input).await {
        Ok(request) => {
            info!(withdrawal_id = %id, "Withdrawal updated");
            (StatusCode::OK, Json(WithdrawalDto::from(request))).into_response()
        }
        Err(e) => withdrawal_error(&e),
    }
}

/// DELETE `/accounting/barber-withdrawals/{id}` - Remove a request.
async fn delete_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = WithdrawalRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(withdrawal_id = %id, "Withdrawal deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => withdrawal_error(&e),
    }
}
