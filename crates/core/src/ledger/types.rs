//! Ledger domain types.
//!
//! This module defines the vocabulary shared by every ledger write path:
//! entry and transaction classifications, payment methods, and the
//! well-known categories the settlement paths resolve on demand.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a financial entry, and of a category.
///
/// Stored amounts are always positive; the sign of an entry is derived
/// from this type (income counts up, expense counts down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming into the shop.
    Income,
    /// Money leaving the shop.
    Expense,
}

impl EntryType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Applies this type's sign to a stored (positive) amount.
    #[must_use]
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing status of a financial entry or transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Fully processed.
    Completed,
    /// Processing failed.
    Failed,
    /// Reversed after completion.
    Refunded,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Card through the shop terminal.
    Card,
    /// Card swiped on the portable reader.
    CardReader,
    /// Bank-to-bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::CardReader => "card_reader",
            Self::Transfer => "transfer",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "card_reader" => Some(Self::CardReader),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction row relative to its bank account.
///
/// Transfer legs need an explicit direction because the transaction
/// kind alone does not say which side of the move a row sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Money arriving (settlements, incoming transfer leg).
    Inflow,
    /// Money leaving (outgoing transfer leg).
    Outflow,
}

impl FlowDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }

    /// Parses a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inflow" => Some(Self::Inflow),
            "outflow" => Some(Self::Outflow),
            _ => None,
        }
    }

    /// Applies this direction's sign to a stored (positive) amount.
    #[must_use]
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Inflow => amount,
            Self::Outflow => -amount,
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Appointment-linked settlement movement.
    Normal,
    /// One leg of a bank-to-bank transfer.
    Transfer,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Transfer => "transfer",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a transaction row pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// The service portion of an appointment settlement.
    ServicePayment,
    /// The tip portion of an appointment settlement.
    TipPayment,
    /// Anything else (transfer legs).
    Other,
}

impl TransactionCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServicePayment => "service_payment",
            Self::TipPayment => "tip_payment",
            Self::Other => "other",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "service_payment" => Some(Self::ServicePayment),
            "tip_payment" => Some(Self::TipPayment),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categories the settlement paths resolve (and create) on demand.
///
/// These are seed data, not schema; every writer resolves them by
/// name and creates the row when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WellKnownCategory {
    /// Income from appointment services.
    ServiceIncome,
    /// Income from customer tips.
    TipIncome,
    /// Salaries and withdrawals paid out to barbers.
    SalaryExpense,
}

impl WellKnownCategory {
    /// The category name as persisted.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ServiceIncome => "Service Income",
            Self::TipIncome => "Tip Income",
            Self::SalaryExpense => "Salary Expense",
        }
    }

    /// The entry type this category belongs to.
    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        match self {
            Self::ServiceIncome | Self::TipIncome => EntryType::Income,
            Self::SalaryExpense => EntryType::Expense,
        }
    }

    /// The description written when the category is auto-created.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ServiceIncome => "Income from barbershop services",
            Self::TipIncome => "Income from customer tips",
            Self::SalaryExpense => "Salaries and withdrawals paid to barbers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_type_roundtrip() {
        for ty in [EntryType::Income, EntryType::Expense] {
            assert_eq!(EntryType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(EntryType::parse("INCOME"), Some(EntryType::Income));
        assert_eq!(EntryType::parse("donation"), None);
    }

    #[test]
    fn test_entry_type_signing() {
        assert_eq!(EntryType::Income.signed(dec!(150000)), dec!(150000));
        assert_eq!(EntryType::Expense.signed(dec!(150000)), dec!(-150000));
        assert_eq!(EntryType::Expense.signed(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_flow_direction_signing() {
        assert_eq!(FlowDirection::Inflow.signed(dec!(500000)), dec!(500000));
        assert_eq!(FlowDirection::Outflow.signed(dec!(500000)), dec!(-500000));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            EntryStatus::Pending,
            EntryStatus::Completed,
            EntryStatus::Failed,
            EntryStatus::Refunded,
        ] {
            assert_eq!(EntryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EntryStatus::parse("unknown"), None);
    }

    #[test]
    fn test_payment_method_defaults_to_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse("card"), Some(PaymentMethod::Card));
        assert_eq!(
            PaymentMethod::parse("card_reader"),
            Some(PaymentMethod::CardReader)
        );
        assert_eq!(PaymentMethod::parse("crypto"), None);
    }

    #[test]
    fn test_transaction_category_roundtrip() {
        for cat in [
            TransactionCategory::ServicePayment,
            TransactionCategory::TipPayment,
            TransactionCategory::Other,
        ] {
            assert_eq!(TransactionCategory::parse(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn test_well_known_categories() {
        assert_eq!(WellKnownCategory::ServiceIncome.name(), "Service Income");
        assert_eq!(WellKnownCategory::TipIncome.name(), "Tip Income");
        assert_eq!(WellKnownCategory::SalaryExpense.name(), "Salary Expense");
        assert_eq!(
            WellKnownCategory::ServiceIncome.entry_type(),
            EntryType::Income
        );
        assert_eq!(WellKnownCategory::TipIncome.entry_type(), EntryType::Income);
        assert_eq!(
            WellKnownCategory::SalaryExpense.entry_type(),
            EntryType::Expense
        );
    }
}
