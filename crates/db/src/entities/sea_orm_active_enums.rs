//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! Each enum converts to and from its `shearbook-core` counterpart so
//! repositories can hand pure domain values to the core services.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification of a financial entry or category.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_type")]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Processing status of an entry or transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Recorded but not yet settled.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Fully processed.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Processing failed.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Reversed after completion.
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// How money changed hands.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the counter.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Card through the shop terminal.
    #[sea_orm(string_value = "card")]
    Card,
    /// Card swiped on the portable reader.
    #[sea_orm(string_value = "card_reader")]
    CardReader,
    /// Bank-to-bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Direction of a transaction row relative to its bank account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "flow_direction")]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Money flowing into the account.
    #[sea_orm(string_value = "inflow")]
    Inflow,
    /// Money flowing out of the account.
    #[sea_orm(string_value = "outflow")]
    Outflow,
}

/// Kind of a transaction row.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Appointment-linked movement.
    #[sea_orm(string_value = "normal")]
    Normal,
    /// One leg of a bank-to-bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Business category of a transaction row.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_category")]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// Payment for appointment services.
    #[sea_orm(string_value = "service_payment")]
    ServicePayment,
    /// Tip paid alongside a settlement.
    #[sea_orm(string_value = "tip_payment")]
    TipPayment,
    /// Anything else, including transfer legs.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "appointment_status")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed by the shop.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Served and settled.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Lifecycle status of a withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdrawal_status")]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Waiting for a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved and paid out.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected without ledger effect.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<shearbook_core::ledger::EntryType> for EntryType {
    fn from(value: shearbook_core::ledger::EntryType) -> Self {
        match value {
            shearbook_core::ledger::EntryType::Income => Self::Income,
            shearbook_core::ledger::EntryType::Expense => Self::Expense,
        }
    }
}

impl From<EntryType> for shearbook_core::ledger::EntryType {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::Income => Self::Income,
            EntryType::Expense => Self::Expense,
        }
    }
}

impl From<shearbook_core::ledger::EntryStatus> for EntryStatus {
    fn from(value: shearbook_core::ledger::EntryStatus) -> Self {
        match value {
            shearbook_core::ledger::EntryStatus::Pending => Self::Pending,
            shearbook_core::ledger::EntryStatus::Completed => Self::Completed,
            shearbook_core::ledger::EntryStatus::Failed => Self::Failed,
            shearbook_core::ledger::EntryStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<EntryStatus> for shearbook_core::ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Pending => Self::Pending,
            EntryStatus::Completed => Self::Completed,
            EntryStatus::Failed => Self::Failed,
            EntryStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<shearbook_core::ledger::PaymentMethod> for PaymentMethod {
    fn from(value: shearbook_core::ledger::PaymentMethod) -> Self {
        match value {
            shearbook_core::ledger::PaymentMethod::Cash => Self::Cash,
            shearbook_core::ledger::PaymentMethod::Card => Self::Card,
            shearbook_core::ledger::PaymentMethod::CardReader => Self::CardReader,
            shearbook_core::ledger::PaymentMethod::Transfer => Self::Transfer,
        }
    }
}

impl From<PaymentMethod> for shearbook_core::ledger::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::CardReader => Self::CardReader,
            PaymentMethod::Transfer => Self::Transfer,
        }
    }
}

impl From<shearbook_core::ledger::FlowDirection> for FlowDirection {
    fn from(value: shearbook_core::ledger::FlowDirection) -> Self {
        match value {
            shearbook_core::ledger::FlowDirection::Inflow => Self::Inflow,
            shearbook_core::ledger::FlowDirection::Outflow => Self::Outflow,
        }
    }
}

impl From<FlowDirection> for shearbook_core::ledger::FlowDirection {
    fn from(value: FlowDirection) -> Self {
        match value {
            FlowDirection::Inflow => Self::Inflow,
            FlowDirection::Outflow => Self::Outflow,
        }
    }
}

impl From<shearbook_core::ledger::TransactionKind> for TransactionKind {
    fn from(value: shearbook_core::ledger::TransactionKind) -> Self {
        match value {
            shearbook_core::ledger::TransactionKind::Normal => Self::Normal,
            shearbook_core::ledger::TransactionKind::Transfer => Self::Transfer,
        }
    }
}

impl From<TransactionKind> for shearbook_core::ledger::TransactionKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Normal => Self::Normal,
            TransactionKind::Transfer => Self::Transfer,
        }
    }
}

impl From<shearbook_core::ledger::TransactionCategory> for TransactionCategory {
    fn from(value: shearbook_core::ledger::TransactionCategory) -> Self {
        match value {
            shearbook_core::ledger::TransactionCategory::ServicePayment => Self::ServicePayment,
            shearbook_core::ledger::TransactionCategory::TipPayment => Self::TipPayment,
            shearbook_core::ledger::TransactionCategory::Other => Self::Other,
        }
    }
}

impl From<TransactionCategory> for shearbook_core::ledger::TransactionCategory {
    fn from(value: TransactionCategory) -> Self {
        match value {
            TransactionCategory::ServicePayment => Self::ServicePayment,
            TransactionCategory::TipPayment => Self::TipPayment,
            TransactionCategory::Other => Self::Other,
        }
    }
}

impl From<shearbook_core::settlement::AppointmentStatus> for AppointmentStatus {
    fn from(value: shearbook_core::settlement::AppointmentStatus) -> Self {
        match value {
            shearbook_core::settlement::AppointmentStatus::Pending => Self::Pending,
            shearbook_core::settlement::AppointmentStatus::Confirmed => Self::Confirmed,
            shearbook_core::settlement::AppointmentStatus::Completed => Self::Completed,
            shearbook_core::settlement::AppointmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<AppointmentStatus> for shearbook_core::settlement::AppointmentStatus {
    fn from(value: AppointmentStatus) -> Self {
        match value {
            AppointmentStatus::Pending => Self::Pending,
            AppointmentStatus::Confirmed => Self::Confirmed,
            AppointmentStatus::Completed => Self::Completed,
            AppointmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<shearbook_core::withdrawal::WithdrawalStatus> for WithdrawalStatus {
    fn from(value: shearbook_core::withdrawal::WithdrawalStatus) -> Self {
        match value {
            shearbook_core::withdrawal::WithdrawalStatus::Pending => Self::Pending,
            shearbook_core::withdrawal::WithdrawalStatus::Approved => Self::Approved,
            shearbook_core::withdrawal::WithdrawalStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<WithdrawalStatus> for shearbook_core::withdrawal::WithdrawalStatus {
    fn from(value: WithdrawalStatus) -> Self {
        match value {
            WithdrawalStatus::Pending => Self::Pending,
            WithdrawalStatus::Approved => Self::Approved,
            WithdrawalStatus::Rejected => Self::Rejected,
        }
    }
}
