//! Settlement domain types.
//!
//! The settlement engine turns an appointment into ledger writes. These
//! types carry the inputs it reads and the plan it produces; executing
//! the plan against storage happens elsewhere.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ledger::types::{PaymentMethod, TransactionCategory, WellKnownCategory};

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed.
    Pending,
    /// Confirmed by the shop.
    Confirmed,
    /// Carried out (and, once settled, paid).
    Completed,
    /// Called off; any settlement has been reversed.
    Cancelled,
}

impl AppointmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if an appointment in this status may be settled.
    #[must_use]
    pub const fn is_settleable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Completed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The slice of an appointment the settlement engine needs.
#[derive(Debug, Clone)]
pub struct AppointmentSnapshot {
    /// The appointment.
    pub id: Uuid,
    /// Current lifecycle status.
    pub status: AppointmentStatus,
    /// When the appointment takes place.
    pub scheduled_at: DateTime<Utc>,
    /// Customer display name, for descriptions.
    pub customer_name: String,
    /// Barber display name, for descriptions.
    pub barber_name: String,
    /// Price snapshots of the booked line items.
    pub line_item_prices: Vec<Decimal>,
}

impl AppointmentSnapshot {
    /// Sum of the booked line-item prices.
    #[must_use]
    pub fn line_item_total(&self) -> Decimal {
        self.line_item_prices.iter().copied().sum()
    }
}

/// Caller-supplied settlement parameters.
#[derive(Debug, Clone, Default)]
pub struct SettlementRequest {
    /// Overrides the service amount; defaults to the line-item total.
    pub amount: Option<Decimal>,
    /// Tip on top of the service amount; defaults to zero.
    pub tip_amount: Option<Decimal>,
    /// How the customer paid; defaults to cash.
    pub payment_method: Option<PaymentMethod>,
}

/// One entry-plus-transaction pair the settlement will write.
#[derive(Debug, Clone)]
pub struct SettlementLeg {
    /// The ledger category to resolve for the entry.
    pub category: WellKnownCategory,
    /// The category stamped on the transaction row.
    pub transaction_category: TransactionCategory,
    /// Amount of this leg (positive).
    pub amount: Decimal,
    /// Human-readable description shared by the entry and transaction.
    pub description: String,
}

/// A fully computed settlement, ready to execute atomically.
#[derive(Debug, Clone)]
pub struct SettlementPlan {
    /// The appointment being settled.
    pub appointment_id: Uuid,
    /// Resolved service amount (after defaulting and clamping).
    pub service_amount: Decimal,
    /// Resolved tip amount (after defaulting and clamping).
    pub tip_amount: Decimal,
    /// How the customer paid.
    pub payment_method: PaymentMethod,
    /// Legs to write; zero-amount legs are omitted.
    pub legs: Vec<SettlementLeg>,
    /// Timestamp stamped on every row the plan writes.
    pub settled_at: DateTime<Utc>,
}

impl SettlementPlan {
    /// Returns true if executing the plan writes any ledger rows.
    ///
    /// A plan with no legs still completes the appointment; it just has
    /// nothing to post.
    #[must_use]
    pub fn has_ledger_effect(&self) -> bool {
        !self.legs.is_empty()
    }
}

/// What an appointment update should do, settlement-wise.
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// The status change triggers a settlement.
    Settle(SettlementPlan),
    /// The status change reverses an existing settlement.
    Reverse,
    /// Plain status change with no ledger effect.
    SetStatus(AppointmentStatus),
}
