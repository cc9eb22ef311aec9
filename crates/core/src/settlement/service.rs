//! Settlement planning and state transition rules.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::ledger::{TransactionCategory, WellKnownCategory, clamp_non_negative};

use super::error::SettlementError;
use super::types::{
    AppointmentSnapshot, AppointmentStatus, SettlementLeg, SettlementPlan, SettlementRequest,
    UpdateAction,
};

/// Plans appointment settlements and validates settlement state transitions.
///
/// The service is pure: it inspects an [`AppointmentSnapshot`] plus a flag
/// telling it whether settlement rows already exist, and produces either a
/// [`SettlementPlan`] for the store to apply atomically or a typed error.
pub struct SettlementService;

impl SettlementService {
    /// Plans the settlement of an appointment.
    ///
    /// Fails if the appointment already has settlement rows or is in a
    /// status that cannot be settled.
    pub fn plan(
        appointment: &AppointmentSnapshot,
        has_settlement_rows: bool,
        request: &SettlementRequest,
        shop_tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<SettlementPlan, SettlementError> {
        if has_settlement_rows {
            return Err(SettlementError::AlreadySettled(appointment.id));
        }
        if !appointment.status.is_settleable() {
            return Err(SettlementError::NotSettleable {
                status: appointment.status,
            });
        }

        Ok(Self::build_plan(appointment, request, shop_tz, now))
    }

    /// Validates that a settled appointment can be reversed.
    ///
    /// Reversal is only allowed once settlement rows exist and the
    /// appointment has reached completed status.
    pub fn validate_cancel(
        appointment: &AppointmentSnapshot,
        has_settlement_rows: bool,
    ) -> Result<(), SettlementError> {
        if !has_settlement_rows {
            return Err(SettlementError::NotSettled(appointment.id));
        }
        if appointment.status != AppointmentStatus::Completed {
            return Err(SettlementError::CancelRequiresCompleted {
                status: appointment.status,
            });
        }
        Ok(())
    }

    /// Validates that an appointment can be deleted.
    ///
    /// Settled appointments are locked: their ledger rows must be reversed
    /// first, otherwise deletion would orphan financial history.
    pub fn validate_delete(
        appointment: &AppointmentSnapshot,
        has_settlement_rows: bool,
    ) -> Result<(), SettlementError> {
        if has_settlement_rows {
            return Err(SettlementError::SettledAppointmentLocked(appointment.id));
        }
        Ok(())
    }

    /// Decides which ledger effect a status update carries.
    ///
    /// Moving to completed without settlement rows settles the appointment
    /// with defaults (line item total, no tip). Moving to cancelled while
    /// settlement rows exist reverses them. Every other update only touches
    /// the status.
    pub fn update_action(
        appointment: &AppointmentSnapshot,
        has_settlement_rows: bool,
        new_status: AppointmentStatus,
        request: &SettlementRequest,
        shop_tz: Tz,
        now: DateTime<Utc>,
    ) -> UpdateAction {
        match new_status {
            AppointmentStatus::Completed if !has_settlement_rows => {
                UpdateAction::Settle(Self::build_plan(appointment, request, shop_tz, now))
            }
            AppointmentStatus::Cancelled if has_settlement_rows => UpdateAction::Reverse,
            _ => UpdateAction::SetStatus(new_status),
        }
    }

    /// Computes the settlement plan without any precondition checks.
    ///
    /// The service amount defaults to the sum of the appointment's line item
    /// prices and the tip to zero; both are clamped at zero so a negative
    /// override can never produce a negative ledger entry.
    fn build_plan(
        appointment: &AppointmentSnapshot,
        request: &SettlementRequest,
        shop_tz: Tz,
        now: DateTime<Utc>,
    ) -> SettlementPlan {
        let service_amount = clamp_non_negative(
            request
                .amount
                .unwrap_or_else(|| appointment.line_item_total()),
        );
        let tip_amount = clamp_non_negative(request.tip_amount.unwrap_or(Decimal::ZERO));
        let payment_method = request.payment_method.unwrap_or_default();

        let local = appointment.scheduled_at.with_timezone(&shop_tz);
        let date = local.format("%Y-%m-%d");
        let time = local.format("%H:%M");

        let mut legs = Vec::new();
        if service_amount > Decimal::ZERO {
            legs.push(SettlementLeg {
                category: WellKnownCategory::ServiceIncome,
                transaction_category: TransactionCategory::ServicePayment,
                amount: service_amount,
                description: format!(
                    "Settlement of appointment {} for {} with {} on {} at {}",
                    appointment.id, appointment.customer_name, appointment.barber_name, date, time
                ),
            });
        }
        if tip_amount > Decimal::ZERO {
            legs.push(SettlementLeg {
                category: WellKnownCategory::TipIncome,
                transaction_category: TransactionCategory::TipPayment,
                amount: tip_amount,
                description: format!(
                    "Tip for appointment {} from {} to {} on {} at {}",
                    appointment.id, appointment.customer_name, appointment.barber_name, date, time
                ),
            });
        }

        SettlementPlan {
            appointment_id: appointment.id,
            service_amount,
            tip_amount,
            payment_method,
            legs,
            settled_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PaymentMethod;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn tehran() -> Tz {
        chrono_tz::Asia::Tehran
    }

    fn appointment(status: AppointmentStatus) -> AppointmentSnapshot {
        AppointmentSnapshot {
            id: Uuid::parse_str("0191a0c0-1111-7000-8000-000000000007").unwrap(),
            status,
            scheduled_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap(),
            customer_name: "Ali Mohammadi".to_string(),
            barber_name: "Reza Ahmadi".to_string(),
            line_item_prices: vec![dec!(100000), dec!(50000)],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plan_defaults_to_line_item_total() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let plan = SettlementService::plan(
            &appt,
            false,
            &SettlementRequest::default(),
            tehran(),
            now(),
        )
        .unwrap();

        assert_eq!(plan.service_amount, dec!(150000));
        assert_eq!(plan.tip_amount, dec!(0));
        assert_eq!(plan.payment_method, PaymentMethod::Cash);
        assert_eq!(plan.legs.len(), 1);
        assert_eq!(plan.legs[0].category, WellKnownCategory::ServiceIncome);
        assert_eq!(
            plan.legs[0].transaction_category,
            TransactionCategory::ServicePayment
        );
        assert!(plan.has_ledger_effect());
    }

    #[test]
    fn test_plan_with_override_and_tip_produces_two_legs() {
        let appt = appointment(AppointmentStatus::Completed);
        let request = SettlementRequest {
            amount: Some(dec!(200000)),
            tip_amount: Some(dec!(20000)),
            payment_method: Some(PaymentMethod::Card),
        };
        let plan = SettlementService::plan(&appt, false, &request, tehran(), now()).unwrap();

        assert_eq!(plan.service_amount, dec!(200000));
        assert_eq!(plan.tip_amount, dec!(20000));
        assert_eq!(plan.payment_method, PaymentMethod::Card);
        assert_eq!(plan.legs.len(), 2);
        assert_eq!(plan.legs[0].amount, dec!(200000));
        assert_eq!(plan.legs[1].category, WellKnownCategory::TipIncome);
        assert_eq!(plan.legs[1].amount, dec!(20000));
        assert_eq!(
            plan.legs[1].transaction_category,
            TransactionCategory::TipPayment
        );
    }

    #[test]
    fn test_plan_clamps_negative_amounts_to_zero() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let request = SettlementRequest {
            amount: Some(dec!(-5000)),
            tip_amount: Some(dec!(-100)),
            payment_method: None,
        };
        let plan = SettlementService::plan(&appt, false, &request, tehran(), now()).unwrap();

        assert_eq!(plan.service_amount, dec!(0));
        assert_eq!(plan.tip_amount, dec!(0));
        assert!(plan.legs.is_empty());
        assert!(!plan.has_ledger_effect());
    }

    #[test]
    fn test_plan_formats_descriptions_in_shop_timezone() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let plan = SettlementService::plan(
            &appt,
            false,
            &SettlementRequest {
                amount: None,
                tip_amount: Some(dec!(10000)),
                payment_method: None,
            },
            tehran(),
            now(),
        )
        .unwrap();

        // 10:30 UTC is 14:00 in Tehran (+03:30).
        assert_eq!(
            plan.legs[0].description,
            "Settlement of appointment 0191a0c0-1111-7000-8000-000000000007 \
             for Ali Mohammadi with Reza Ahmadi on 2024-03-15 at 14:00"
        );
        assert_eq!(
            plan.legs[1].description,
            "Tip for appointment 0191a0c0-1111-7000-8000-000000000007 \
             from Ali Mohammadi to Reza Ahmadi on 2024-03-15 at 14:00"
        );
    }

    #[test]
    fn test_plan_rejects_already_settled() {
        let appt = appointment(AppointmentStatus::Completed);
        let result = SettlementService::plan(
            &appt,
            true,
            &SettlementRequest::default(),
            tehran(),
            now(),
        );
        assert!(matches!(result, Err(SettlementError::AlreadySettled(_))));
    }

    #[test]
    fn test_plan_rejects_cancelled_appointment() {
        let appt = appointment(AppointmentStatus::Cancelled);
        let result = SettlementService::plan(
            &appt,
            false,
            &SettlementRequest::default(),
            tehran(),
            now(),
        );
        assert!(matches!(
            result,
            Err(SettlementError::NotSettleable {
                status: AppointmentStatus::Cancelled
            })
        ));
    }

    #[test]
    fn test_validate_cancel_requires_settlement_rows() {
        let appt = appointment(AppointmentStatus::Completed);
        let result = SettlementService::validate_cancel(&appt, false);
        assert!(matches!(result, Err(SettlementError::NotSettled(_))));
    }

    #[test]
    fn test_validate_cancel_requires_completed_status() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let result = SettlementService::validate_cancel(&appt, true);
        assert!(matches!(
            result,
            Err(SettlementError::CancelRequiresCompleted {
                status: AppointmentStatus::Confirmed
            })
        ));
    }

    #[test]
    fn test_validate_cancel_accepts_settled_completed() {
        let appt = appointment(AppointmentStatus::Completed);
        assert!(SettlementService::validate_cancel(&appt, true).is_ok());
    }

    #[test]
    fn test_validate_delete_locks_settled_appointments() {
        let appt = appointment(AppointmentStatus::Completed);
        assert!(matches!(
            SettlementService::validate_delete(&appt, true),
            Err(SettlementError::SettledAppointmentLocked(_))
        ));
        assert!(SettlementService::validate_delete(&appt, false).is_ok());
    }

    #[test]
    fn test_update_to_completed_settles_without_tip() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let action = SettlementService::update_action(
            &appt,
            false,
            AppointmentStatus::Completed,
            &SettlementRequest::default(),
            tehran(),
            now(),
        );

        match action {
            UpdateAction::Settle(plan) => {
                assert_eq!(plan.service_amount, dec!(150000));
                assert_eq!(plan.tip_amount, dec!(0));
                assert_eq!(plan.legs.len(), 1);
            }
            other => panic!("expected settle action, got {other:?}"),
        }
    }

    #[test]
    fn test_update_to_completed_when_settled_only_sets_status() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let action = SettlementService::update_action(
            &appt,
            true,
            AppointmentStatus::Completed,
            &SettlementRequest::default(),
            tehran(),
            now(),
        );
        assert!(matches!(
            action,
            UpdateAction::SetStatus(AppointmentStatus::Completed)
        ));
    }

    #[test]
    fn test_update_to_cancelled_reverses_settlement() {
        let appt = appointment(AppointmentStatus::Completed);
        let action = SettlementService::update_action(
            &appt,
            true,
            AppointmentStatus::Cancelled,
            &SettlementRequest::default(),
            tehran(),
            now(),
        );
        assert!(matches!(action, UpdateAction::Reverse));
    }

    #[test]
    fn test_update_to_cancelled_without_rows_only_sets_status() {
        let appt = appointment(AppointmentStatus::Pending);
        let action = SettlementService::update_action(
            &appt,
            false,
            AppointmentStatus::Cancelled,
            &SettlementRequest::default(),
            tehran(),
            now(),
        );
        assert!(matches!(
            action,
            UpdateAction::SetStatus(AppointmentStatus::Cancelled)
        ));
    }
}
