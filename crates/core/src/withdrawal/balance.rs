//! Barber balance computation.
//!
//! A barber's balance is derived, never stored: it is the income entries
//! written by settlements of their completed appointments minus the
//! withdrawals that were actually approved. Pending and rejected requests
//! never move the balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settlement::AppointmentStatus;

use super::types::WithdrawalStatus;

/// A barber considered for balance computation.
#[derive(Debug, Clone)]
pub struct BarberRef {
    /// Barber id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// An appointment row, reduced to what balance computation needs.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentRef {
    /// Appointment id.
    pub id: Uuid,
    /// The barber who served it.
    pub barber_id: Uuid,
    /// Current status.
    pub status: AppointmentStatus,
}

/// An income entry written by a settlement, keyed by its source appointment.
///
/// Both service and tip entries count toward the barber's income.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentIncome {
    /// The appointment the entry was written for.
    pub appointment_id: Uuid,
    /// Entry amount.
    pub amount: Decimal,
}

/// A withdrawal request row, reduced to what balance computation needs.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalRef {
    /// The barber who requested it.
    pub barber_id: Uuid,
    /// Requested amount.
    pub amount: Decimal,
    /// Current status.
    pub status: WithdrawalStatus,
}

/// Earned income, approved withdrawals, and the remaining balance of a barber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarberBalance {
    /// Barber id.
    pub barber_id: Uuid,
    /// Display name.
    pub barber_name: String,
    /// Income entries from settlements of completed appointments.
    pub total_income: Decimal,
    /// Sum of approved withdrawal requests.
    pub total_withdrawn: Decimal,
    /// total income - total withdrawn.
    pub balance: Decimal,
}

/// Computes the balance of a single barber.
#[must_use]
pub fn barber_balance(
    barber: &BarberRef,
    appointments: &[AppointmentRef],
    incomes: &[AppointmentIncome],
    withdrawals: &[WithdrawalRef],
) -> BarberBalance {
    let total_income: Decimal = incomes
        .iter()
        .filter(|income| {
            appointments.iter().any(|appt| {
                appt.id == income.appointment_id
                    && appt.barber_id == barber.id
                    && appt.status == AppointmentStatus::Completed
            })
        })
        .map(|income| income.amount)
        .sum();

    let total_withdrawn: Decimal = withdrawals
        .iter()
        .filter(|w| w.barber_id == barber.id && w.status == WithdrawalStatus::Approved)
        .map(|w| w.amount)
        .sum();

    BarberBalance {
        barber_id: barber.id,
        barber_name: barber.name.clone(),
        total_income,
        total_withdrawn,
        balance: total_income - total_withdrawn,
    }
}

/// Computes the balance of every barber in the list.
#[must_use]
pub fn barbers_balances(
    barbers: &[BarberRef],
    appointments: &[AppointmentRef],
    incomes: &[AppointmentIncome],
    withdrawals: &[WithdrawalRef],
) -> Vec<BarberBalance> {
    barbers
        .iter()
        .map(|barber| barber_balance(barber, appointments, incomes, withdrawals))
        .collect()
}
