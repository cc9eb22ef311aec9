//! JSON response shapes shared across route modules.
//!
//! Every DTO renders with camelCase keys. Amounts serialize as strings
//! with full decimal precision.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shearbook_core::ledger::AccountBalance;
use shearbook_db::entities::{
    appointments, bank_accounts, financial_categories, financial_entries, salaries,
    sea_orm_active_enums::{
        AppointmentStatus, EntryStatus, EntryType, FlowDirection, PaymentMethod,
        TransactionCategory, TransactionKind, WithdrawalStatus,
    },
    transactions, withdrawal_requests,
};
use shearbook_db::repositories::appointment::SettlementOutcome;
use shearbook_db::repositories::bank_account::BankAccountWithBalance;
use shearbook_db::repositories::salary::SalaryWithBarber;
use shearbook_db::repositories::withdrawal::WithdrawalWithPayout;

/// An appointment record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    /// Appointment ID.
    pub id: Uuid,
    /// Customer being served.
    pub customer_id: Uuid,
    /// Barber serving the appointment.
    pub barber_id: Uuid,
    /// When the appointment takes place.
    pub scheduled_at: DateTime<FixedOffset>,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<appointments::Model> for AppointmentDto {
    fn from(model: appointments::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            barber_id: model.barber_id,
            scheduled_at: model.scheduled_at,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A ledger entry row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntryDto {
    /// Entry ID.
    pub id: Uuid,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Income or expense.
    pub entry_type: EntryType,
    /// When the entry took effect.
    pub entry_date: DateTime<FixedOffset>,
    /// Human-readable description.
    pub description: String,
    /// Category the entry is classified under.
    pub category_id: Uuid,
    /// Bank account the entry is booked against, if any.
    pub bank_account_id: Option<Uuid>,
    /// Reference tag linking the entry to its source record.
    pub reference: Option<String>,
    /// Appointment that produced the entry, if any.
    pub source_appointment_id: Option<Uuid>,
    /// Withdrawal request that produced the entry, if any.
    pub source_withdrawal_id: Option<Uuid>,
    /// How the money moved.
    pub payment_method: PaymentMethod,
    /// Admin who recorded the entry, if any.
    pub created_by: Option<Uuid>,
    /// Processing status.
    pub status: EntryStatus,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<financial_entries::Model> for FinancialEntryDto {
    fn from(model: financial_entries::Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            entry_type: model.entry_type,
            entry_date: model.entry_date,
            description: model.description,
            category_id: model.category_id,
            bank_account_id: model.bank_account_id,
            reference: model.reference,
            source_appointment_id: model.source_appointment_id,
            source_withdrawal_id: model.source_withdrawal_id,
            payment_method: model.payment_method,
            created_by: model.created_by,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// A settlement-side transaction row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    /// Transaction ID.
    pub id: Uuid,
    /// Owning appointment for settlement rows.
    pub appointment_id: Option<Uuid>,
    /// Owning bank account for transfer legs.
    pub bank_account_id: Option<Uuid>,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Inflow or outflow.
    pub direction: FlowDirection,
    /// Normal settlement row or transfer leg.
    #[serde(rename = "type")]
    pub transaction_type: TransactionKind,
    /// Settlement category.
    pub category: TransactionCategory,
    /// Processing status.
    pub status: EntryStatus,
    /// How the money moved.
    pub payment_method: PaymentMethod,
    /// Human-readable description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<transactions::Model> for TransactionDto {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            appointment_id: model.appointment_id,
            bank_account_id: model.bank_account_id,
            amount: model.amount,
            direction: model.direction,
            transaction_type: model.transaction_type,
            category: model.category,
            status: model.status,
            payment_method: model.payment_method,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

/// An appointment together with the ledger rows its settlement wrote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementDto {
    /// The appointment, now completed.
    pub appointment: AppointmentDto,
    /// Income entries written by the settlement, service leg first.
    pub entries: Vec<FinancialEntryDto>,
    /// Transaction rows written by the settlement, service leg first.
    pub transactions: Vec<TransactionDto>,
}

impl From<SettlementOutcome> for SettlementDto {
    fn from(outcome: SettlementOutcome) -> Self {
        Self {
            appointment: outcome.appointment.into(),
            entries: outcome.entries.into_iter().map(Into::into).collect(),
            transactions: outcome.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

/// A bank account record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountDto {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Card number, 16 digits.
    pub card_number: String,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<bank_accounts::Model> for BankAccountDto {
    fn from(model: bank_accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            card_number: model.card_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A bank account with its balance derived at read time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountWithBalanceDto {
    /// The account record.
    #[serde(flatten)]
    pub account: BankAccountDto,
    /// Balance derived from the ledger.
    pub balance: AccountBalance,
}

impl From<BankAccountWithBalance> for BankAccountWithBalanceDto {
    fn from(row: BankAccountWithBalance) -> Self {
        Self {
            account: row.account.into(),
            balance: row.balance,
        }
    }
}

/// A withdrawal request record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalDto {
    /// Request ID.
    pub id: Uuid,
    /// Barber drawing down their balance.
    pub barber_id: Uuid,
    /// Requested amount.
    pub amount: Decimal,
    /// Workflow status.
    pub status: WithdrawalStatus,
    /// Admin who decided the request, if any.
    pub approved_by: Option<Uuid>,
    /// Free-text note.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<withdrawal_requests::Model> for WithdrawalDto {
    fn from(model: withdrawal_requests::Model) -> Self {
        Self {
            id: model.id,
            barber_id: model.barber_id,
            amount: model.amount,
            status: model.status,
            approved_by: model.approved_by,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A withdrawal request joined with its payout state for listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalWithPayoutDto {
    /// The request record.
    #[serde(flatten)]
    pub request: WithdrawalDto,
    /// Display name of the requesting barber.
    pub barber_name: String,
    /// Whether a payout entry exists.
    pub paid: bool,
    /// When the payout entry was booked, if paid.
    pub paid_at: Option<DateTime<FixedOffset>>,
    /// Bank account on the payout entry, if any.
    pub bank_account: Option<BankAccountDto>,
}

impl From<WithdrawalWithPayout> for WithdrawalWithPayoutDto {
    fn from(row: WithdrawalWithPayout) -> Self {
        Self {
            request: row.request.into(),
            barber_name: row.barber_name,
            paid: row.paid,
            paid_at: row.paid_at,
            bank_account: row.bank_account.map(Into::into),
        }
    }
}

/// A financial category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    /// Category ID.
    pub id: Uuid,
    /// Category name, unique per type.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: EntryType,
    /// Free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<financial_categories::Model> for CategoryDto {
    fn from(model: financial_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category_type: model.category_type,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

/// A salary record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDto {
    /// Salary ID.
    pub id: Uuid,
    /// Barber the salary belongs to.
    pub barber_id: Uuid,
    /// Salary amount.
    pub amount: Decimal,
    /// Calendar month, 1 through 12.
    pub month: i16,
    /// Calendar year.
    pub year: i16,
    /// Whether the salary has been paid out.
    pub is_paid: bool,
    /// When the salary was paid, if paid.
    pub paid_at: Option<DateTime<FixedOffset>>,
    /// Free-text note.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<salaries::Model> for SalaryDto {
    fn from(model: salaries::Model) -> Self {
        Self {
            id: model.id,
            barber_id: model.barber_id,
            amount: model.amount,
            month: model.month,
            year: model.year,
            is_paid: model.is_paid,
            paid_at: model.paid_at,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A salary record joined with the barber's display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryWithBarberDto {
    /// The salary record.
    #[serde(flatten)]
    pub salary: SalaryDto,
    /// Display name of the barber.
    pub barber_name: String,
}

impl From<SalaryWithBarber> for SalaryWithBarberDto {
    fn from(row: SalaryWithBarber) -> Self {
        Self {
            salary: row.salary.into(),
            barber_name: row.barber_name,
        }
    }
}
