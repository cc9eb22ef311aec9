//! Appointment settlement routes.
//!
//! Settling, reversing, and deleting appointments all route through the
//! settlement rules, so an appointment's ledger rows can never drift
//! from its status.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, patch, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use shearbook_core::ledger::PaymentMethod;
use shearbook_core::settlement::{AppointmentStatus, SettlementError, SettlementRequest};
use shearbook_db::AppointmentRepository;
use shearbook_db::repositories::appointment::{UpdateAppointmentInput, UpdateOutcome};

use crate::{
    AppState,
    dto::{AppointmentDto, SettlementDto},
    error::error_response,
};

/// Creates the appointment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/appointments/{id}/settle", post(settle_appointment))
        .route("/appointments/{id}/cancel-settled", post(cancel_settled))
        .route("/appointments/{id}", patch(update_appointment))
        .route("/appointments/{id}", delete(delete_appointment))
}

/// Request body for settling an appointment.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleBody {
    /// Overrides the service amount; defaults to the line-item total.
    pub amount: Option<Decimal>,
    /// Tip on top of the service amount.
    pub tip_amount: Option<Decimal>,
    /// How the customer paid; defaults to cash.
    pub payment_method: Option<PaymentMethod>,
}

impl From<SettleBody> for SettlementRequest {
    fn from(body: SettleBody) -> Self {
        Self {
            amount: body.amount,
            tip_amount: body.tip_amount,
            payment_method: body.payment_method,
        }
    }
}

/// Request body for updating an appointment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentBody {
    /// New lifecycle status.
    pub status: Option<AppointmentStatus>,
    /// New appointment time.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// New free-text notes.
    pub notes: Option<String>,
    /// Service amount override, used when the update settles.
    pub amount: Option<Decimal>,
    /// Tip recorded when the update settles.
    pub tip_amount: Option<Decimal>,
    /// Payment method recorded when the update settles.
    pub payment_method: Option<PaymentMethod>,
}

fn settlement_error(err: &SettlementError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// POST `/appointments/{id}/settle` - Settle an appointment.
async fn settle_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<SettleBody>>,
) -> impl IntoResponse {
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    let repo = AppointmentRepository::new((*state.db).clone());

    match repo.settle(id, &body.into(), state.shop_tz).await {
        Ok(outcome) => {
            info!(
                appointment_id = %id,
                entries = outcome.entries.len(),
                "Appointment settled"
            );
            (StatusCode::OK, Json(SettlementDto::from(outcome))).into_response()
        }
        Err(e) => settlement_error(&e),
    }
}

/// POST `/appointments/{id}/cancel-settled` - Reverse a settlement.
async fn cancel_settled(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AppointmentRepository::new((*state.db).clone());

    match repo.cancel_settled(id).await {
        Ok(appointment) => {
            info!(appointment_id = %id, "Settlement reversed");
            (StatusCode::OK, Json(AppointmentDto::from(appointment))).into_response()
        }
        Err(e) => settlement_error(&e),
    }
}

/// PATCH `/appointments/{id}` - Update an appointment.
///
/// Moving to completed settles the appointment; moving a settled one to
/// cancelled reverses it. The response carries the written ledger rows
/// when the update settled.
async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentBody>,
) -> impl IntoResponse {
    let input = UpdateAppointmentInput {
        status: payload.status,
        scheduled_at: payload.scheduled_at,
        notes: payload.notes,
        settlement: SettlementRequest {
            amount: payload.amount,
            tip_amount: payload.tip_amount,
            payment_method: payload.payment_method,
        },
    };
    let repo = AppointmentRepository::new((*state.db).clone());

    match repo.update(id, input, state.shop_tz).await {
        Ok(UpdateOutcome::Settled(outcome)) => {
            info!(appointment_id = %id, "Appointment settled via status update");
            (StatusCode::OK, Json(SettlementDto::from(outcome))).into_response()
        }
        Ok(UpdateOutcome::Reversed(appointment)) => {
            info!(appointment_id = %id, "Settlement reversed via status update");
            (StatusCode::OK, Json(AppointmentDto::from(appointment))).into_response()
        }
        Ok(UpdateOutcome::Updated(appointment)) => {
            (StatusCode::OK, Json(AppointmentDto::from(appointment))).into_response()
        }
        Err(e) => settlement_error(&e),
    }
}

/// DELETE `/appointments/{id}` - Delete an unsettled appointment.
async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AppointmentRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(appointment_id = %id, "Appointment deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => settlement_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_body_parses_camel_case_fields() {
        let body: SettleBody =
            serde_json::from_str(r#"{"tipAmount": "20000", "paymentMethod": "card_reader"}"#)
                .expect("valid body");

        let request = SettlementRequest::from(body);
        assert_eq!(request.amount, None);
        assert_eq!(request.tip_amount, Some(Decimal::from(20_000)));
        assert_eq!(request.payment_method, Some(PaymentMethod::CardReader));
    }

    #[test]
    fn test_empty_settle_body_leaves_defaults() {
        let body: SettleBody = serde_json::from_str("{}").expect("valid body");

        let request = SettlementRequest::from(body);
        assert_eq!(request.amount, None);
        assert_eq!(request.tip_amount, None);
        assert_eq!(request.payment_method, None);
    }
}
