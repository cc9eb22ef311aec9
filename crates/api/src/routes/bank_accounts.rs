//! Bank account and transfer routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shearbook_core::ledger::LedgerError;
use shearbook_core::transfer::TransferError;
use shearbook_db::BankAccountRepository;
use shearbook_db::entities::{
    sea_orm_active_enums::{
        EntryStatus, FlowDirection, PaymentMethod, TransactionCategory, TransactionKind,
    },
    transactions,
};
use shearbook_db::repositories::bank_account::{
    CreateBankAccountInput, TransferInput, UpdateBankAccountInput,
};

use crate::{
    AppState,
    dto::{BankAccountDto, BankAccountWithBalanceDto},
    error::error_response,
};

/// Creates the bank account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounting/bank-accounts", get(list_accounts))
        .route("/accounting/bank-accounts", post(create_account))
        .route("/accounting/bank-accounts/transfer", post(transfer))
        .route("/accounting/bank-accounts/{id}", get(get_account))
        .route("/accounting/bank-accounts/{id}", patch(update_account))
        .route("/accounting/bank-accounts/{id}", delete(delete_account))
}

/// Request body for creating a bank account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccountBody {
    /// Display name.
    pub name: String,
    /// Card number; whitespace is stripped before validation.
    pub card_number: String,
}

/// Request body for updating a bank account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankAccountBody {
    /// New display name.
    pub name: Option<String>,
    /// New card number.
    pub card_number: Option<String>,
}

/// Request body for a bank-to-bank transfer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Amount to move, must be positive.
    pub amount: Decimal,
    /// Optional note appended to both leg descriptions.
    pub description: Option<String>,
}

/// One leg of a transfer; the amount carries the direction's sign.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLegDto {
    /// Transaction ID.
    pub id: Uuid,
    /// The account this leg touches.
    pub bank_account_id: Option<Uuid>,
    /// Signed amount, negative on the outflow leg.
    pub amount: Decimal,
    /// Inflow or outflow.
    pub direction: FlowDirection,
    /// Always the transfer kind.
    #[serde(rename = "type")]
    pub transaction_type: TransactionKind,
    /// Settlement category, always other.
    pub category: TransactionCategory,
    /// Processing status.
    pub status: EntryStatus,
    /// How the money moved.
    pub payment_method: PaymentMethod,
    /// Description naming the counter-account.
    pub description: Option<String>,
}

impl From<transactions::Model> for TransferLegDto {
    fn from(model: transactions::Model) -> Self {
        let amount = model.signed_amount();
        Self {
            id: model.id,
            bank_account_id: model.bank_account_id,
            amount,
            direction: model.direction,
            transaction_type: model.transaction_type,
            category: model.category,
            status: model.status,
            payment_method: model.payment_method,
            description: model.description,
        }
    }
}

/// Response for a completed transfer, both legs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Outflow leg on the source account.
    pub expense: TransferLegDto,
    /// Inflow leg on the destination account.
    pub income: TransferLegDto,
}

fn ledger_error(err: &LedgerError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

fn transfer_error(err: &TransferError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/accounting/bank-accounts` - List accounts with derived balances.
async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BankAccountRepository::new((*state.db).clone());

    match repo.list_with_balances().await {
        Ok(rows) => {
            let rows: Vec<BankAccountWithBalanceDto> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/accounting/bank-accounts` - Create a bank account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateBankAccountBody>,
) -> impl IntoResponse {
    let repo = BankAccountRepository::new((*state.db).clone());
    let input = CreateBankAccountInput {
        name: payload.name,
        card_number: payload.card_number,
    };

    match repo.create(input).await {
        Ok(account) => {
            info!(account_id = %account.id, "Bank account created");
            (StatusCode::CREATED, Json(BankAccountDto::from(account))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// GET `/accounting/bank-accounts/{id}` - Get one account with its balance.
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BankAccountRepository::new((*state.db).clone());

    match repo.get_with_balance(id).await {
        Ok(row) => {
            (StatusCode::OK, Json(BankAccountWithBalanceDto::from(row))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// PATCH `/accounting/bank-accounts/{id}` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBankAccountBody>,
) -> impl IntoResponse {
    let repo = BankAccountRepository::new((*state.db).clone());
    let input = UpdateBankAccountInput {
        name: payload.name,
        card_number: payload.card_number,
    };

    match repo.update(id, input).await {
        Ok(account) => {
            info!(account_id = %id, "Bank account updated");
            (StatusCode::OK, Json(BankAccountDto::from(account))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// DELETE `/accounting/bank-accounts/{id}` - Delete an unused account.
async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BankAccountRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(account_id = %id, "Bank account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/accounting/bank-accounts/transfer` - Move money between accounts.
async fn transfer(
    State(state): State<AppState>,
    Json(payload): Json<TransferBody>,
) -> impl IntoResponse {
    let repo = BankAccountRepository::new((*state.db).clone());
    let input = TransferInput {
        from_account_id: payload.from_account_id,
        to_account_id: payload.to_account_id,
        amount: payload.amount,
        description: payload.description,
    };

    match repo.transfer(input).await {
        Ok(outcome) => {
            info!(
                from = %payload.from_account_id,
                to = %payload.to_account_id,
                "Transfer completed"
            );
            let response = TransferResponse {
                expense: outcome.outgoing.into(),
                income: outcome.incoming.into(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => transfer_error(&e),
    }
}
