//! Ledger domain logic.
//!
//! This module implements the pure parts of the financial ledger:
//! - Entry, transaction, and category classifications
//! - Reference tags linking entries to their originating records
//! - Derived bank account balances
//! - Input validation (amounts, card numbers)
//! - Salary record rules
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod reference;
pub mod salary;
pub mod types;
pub mod validation;

pub use balance::{AccountBalance, account_balance};
pub use error::LedgerError;
pub use reference::{ReferenceTag, appointment_tag, salary_tag, withdrawal_tag};
pub use salary::{salary_payment_description, validate_salary};
pub use types::{
    EntryStatus, EntryType, FlowDirection, PaymentMethod, TransactionCategory, TransactionKind,
    WellKnownCategory,
};
pub use validation::{clamp_non_negative, normalize_card_number, require_positive};
