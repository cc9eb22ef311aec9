//! Property-based tests for settlement planning.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::SettlementError;
use super::service::SettlementService;
use super::types::{AppointmentSnapshot, AppointmentStatus, SettlementRequest, UpdateAction};

/// Strategy to generate whole currency amounts, including negatives.
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(Decimal::from)
}

/// Strategy to generate non-negative line item prices.
fn line_item_prices() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..500_000i64).prop_map(Decimal::from), 0..5)
}

/// Strategy to generate an appointment status.
fn status_strategy() -> impl Strategy<Value = AppointmentStatus> {
    prop_oneof![
        Just(AppointmentStatus::Pending),
        Just(AppointmentStatus::Confirmed),
        Just(AppointmentStatus::Completed),
        Just(AppointmentStatus::Cancelled),
    ]
}

fn make_appointment(status: AppointmentStatus, prices: Vec<Decimal>) -> AppointmentSnapshot {
    AppointmentSnapshot {
        id: Uuid::new_v4(),
        status,
        scheduled_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        customer_name: "Customer".to_string(),
        barber_name: "Barber".to_string(),
        line_item_prices: prices,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* override and tip amounts, the planned service amount and
    /// tip amount are never negative.
    #[test]
    fn prop_planned_amounts_never_negative(
        amount in proptest::option::of(any_amount()),
        tip in proptest::option::of(any_amount()),
        prices in line_item_prices(),
    ) {
        let appt = make_appointment(AppointmentStatus::Confirmed, prices);
        let request = SettlementRequest { amount, tip_amount: tip, payment_method: None };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let plan = SettlementService::plan(&appt, false, &request, chrono_tz::Asia::Tehran, now)?;

        prop_assert!(plan.service_amount >= Decimal::ZERO);
        prop_assert!(plan.tip_amount >= Decimal::ZERO);
    }

    /// *For any* plan, the ledger legs sum to exactly the service amount
    /// plus the tip amount.
    #[test]
    fn prop_leg_sum_matches_plan_totals(
        amount in proptest::option::of(any_amount()),
        tip in proptest::option::of(any_amount()),
        prices in line_item_prices(),
    ) {
        let appt = make_appointment(AppointmentStatus::Confirmed, prices);
        let request = SettlementRequest { amount, tip_amount: tip, payment_method: None };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let plan = SettlementService::plan(&appt, false, &request, chrono_tz::Asia::Tehran, now)?;

        let leg_sum: Decimal = plan.legs.iter().map(|leg| leg.amount).sum();
        prop_assert_eq!(leg_sum, plan.service_amount + plan.tip_amount);
        prop_assert_eq!(plan.has_ledger_effect(), !plan.legs.is_empty());
    }

    /// *For any* appointment that already has settlement rows, planning a
    /// second settlement always fails.
    #[test]
    fn prop_settled_appointment_cannot_settle_again(
        status in status_strategy(),
        prices in line_item_prices(),
    ) {
        let appt = make_appointment(status, prices);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let result = SettlementService::plan(
            &appt,
            true,
            &SettlementRequest::default(),
            chrono_tz::Asia::Tehran,
            now,
        );
        prop_assert!(matches!(result, Err(SettlementError::AlreadySettled(_))));
    }

    /// *For any* status update, a settle action is only produced when no
    /// settlement rows exist and a reversal only when they do.
    #[test]
    fn prop_update_action_respects_settlement_state(
        status in status_strategy(),
        new_status in status_strategy(),
        has_rows in any::<bool>(),
        prices in line_item_prices(),
    ) {
        let appt = make_appointment(status, prices);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let action = SettlementService::update_action(
            &appt,
            has_rows,
            new_status,
            &SettlementRequest::default(),
            chrono_tz::Asia::Tehran,
            now,
        );

        match action {
            UpdateAction::Settle(_) => {
                prop_assert!(!has_rows);
                prop_assert_eq!(new_status, AppointmentStatus::Completed);
            }
            UpdateAction::Reverse => {
                prop_assert!(has_rows);
                prop_assert_eq!(new_status, AppointmentStatus::Cancelled);
            }
            UpdateAction::SetStatus(s) => prop_assert_eq!(s, new_status),
        }
    }
}
