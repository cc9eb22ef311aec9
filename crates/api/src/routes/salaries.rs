//! Monthly salary routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shearbook_core::ledger::LedgerError;
use shearbook_db::SalaryRepository;
use shearbook_db::repositories::salary::{
    CreateSalaryInput, PaySalaryInput, SalaryFilter, UpdateSalaryInput,
};

use crate::{
    AppState,
    dto::{FinancialEntryDto, SalaryDto, SalaryWithBarberDto},
    error::error_response,
};

/// Creates the salary routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounting/salaries", get(list_salaries))
        .route("/accounting/salaries", post(create_salary))
        .route("/accounting/salaries/{id}", put(update_salary))
        .route("/accounting/salaries/{id}/pay", put(pay_salary))
        .route("/accounting/salaries/{id}", delete(delete_salary))
}

/// Query parameters for listing salary records.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalariesQuery {
    /// Restrict to one barber.
    pub barber_id: Option<Uuid>,
    /// Restrict to one month.
    pub month: Option<i16>,
    /// Restrict to one year.
    pub year: Option<i16>,
    /// Restrict by payment state.
    pub is_paid: Option<bool>,
}

/// Request body for creating a salary record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalaryBody {
    /// The barber the salary belongs to.
    pub barber_id: Uuid,
    /// Salary amount.
    pub amount: Decimal,
    /// Calendar month, 1 through 12.
    pub month: i16,
    /// Calendar year.
    pub year: i16,
    /// Optional note.
    pub description: Option<String>,
}

/// Request body for updating an unpaid salary record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalaryBody {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New month.
    pub month: Option<i16>,
    /// New year.
    pub year: Option<i16>,
    /// New note.
    pub description: Option<String>,
}

/// Request body for paying a salary.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaySalaryBody {
    /// Bank account the expense entry is booked against.
    pub bank_account_id: Option<Uuid>,
    /// Admin recording the payment.
    pub paid_by: Option<Uuid>,
}

/// Response for a paid salary, the record plus the expense entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidSalaryResponse {
    /// The salary record, now paid.
    pub salary: SalaryDto,
    /// The expense entry booked for the payment.
    pub entry: FinancialEntryDto,
}

fn ledger_error(err: &LedgerError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/accounting/salaries` - List salary records with barber names.
async fn list_salaries(
    State(state): State<AppState>,
    Query(query): Query<ListSalariesQuery>,
) -> impl IntoResponse {
    let repo = SalaryRepository::new((*state.db).clone());
    let filter = SalaryFilter {
        barber_id: query.barber_id,
        month: query.month,
        year: query.year,
        is_paid: query.is_paid,
    };

    match repo.list(filter).await {
        Ok(rows) => {
            let rows: Vec<SalaryWithBarberDto> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/accounting/salaries` - Create a salary record.
async fn create_salary(
    State(state): State<AppState>,
    Json(payload): Json<CreateSalaryBody>,
) -> impl IntoResponse {
    let repo = SalaryRepository::new((*state.db).clone());
    let input = CreateSalaryInput {
        barber_id: payload.barber_id,
        amount: payload.amount,
        month: payload.month,
        year: payload.year,
        description: payload.description,
    };

    match repo.create(input).await {
        Ok(salary) => {
            info!(
                salary_id = %salary.id,
                barber_id = %salary.barber_id,
                "Salary created"
            );
            (StatusCode::CREATED, Json(SalaryDto::from(salary))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// PUT `/accounting/salaries/{id}` - Update an unpaid salary record.
async fn update_salary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSalaryBody>,
) -> impl IntoResponse {
    let repo = SalaryRepository::new((*state.db).clone());
    let input = UpdateSalaryInput {
        amount: payload.amount,
        month: payload.month,
        year: payload.year,
        description: payload.description,
    };

    match repo.update(id, input).await {
        Ok(salary) => {
            info!(salary_id = %id, "Salary updated");
            (StatusCode::OK, Json(SalaryDto::from(salary))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// PUT `/accounting/salaries/{id}/pay` - Pay a salary and book the expense.
async fn pay_salary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<PaySalaryBody>>,
) -> impl IntoResponse {
    let repo = SalaryRepository::new((*state.db).clone());
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    let input = PaySalaryInput {
        bank_account_id: body.bank_account_id,
        paid_by: body.paid_by,
    };

    match repo.pay(id, input).await {
        Ok(paid) => {
            info!(salary_id = %id, "Salary paid");
            let response = PaidSalaryResponse {
                salary: paid.salary.into(),
                entry: paid.entry.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// DELETE `/accounting/salaries/{id}` - Remove a record and its payment entry.
async fn delete_salary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SalaryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(salary_id = %id, "Salary deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => ledger_error(&e),
    }
}
