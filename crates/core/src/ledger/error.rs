//! Ledger error types for validation and state errors.
//!
//! Covers the ledger store and the records it references: categories,
//! bank accounts, salaries, and the settings the settlement path reads.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount must be greater than zero.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Card number failed validation.
    #[error("Malformed card number: {0}")]
    InvalidCardNumber(String),

    /// Setting value could not be interpreted.
    #[error("Invalid setting value for {key}: {value}")]
    InvalidSettingValue {
        /// The setting key.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// Month must be between 1 and 12.
    #[error("Invalid month: {0}")]
    InvalidMonth(i16),

    // ========== Category Errors ==========
    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// A category with this name and type already exists.
    #[error("Category already exists: {name}")]
    DuplicateCategory {
        /// The conflicting category name.
        name: String,
    },

    /// Category still has entries referencing it.
    #[error("Category {0} has entries and cannot be deleted")]
    CategoryInUse(Uuid),

    // ========== Bank Account Errors ==========
    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

    /// Bank account still has ledger activity referencing it.
    #[error("Bank account {0} has ledger activity and cannot be deleted")]
    BankAccountInUse(Uuid),

    // ========== Salary Errors ==========
    /// Salary record not found.
    #[error("Salary not found: {0}")]
    SalaryNotFound(Uuid),

    /// A salary for this barber and month already exists.
    #[error("Salary for barber {barber_id} already exists for {month}/{year}")]
    DuplicateSalary {
        /// The barber.
        barber_id: Uuid,
        /// Month (1-12).
        month: i16,
        /// Year.
        year: i16,
    },

    /// Salary has already been paid.
    #[error("Salary {0} has already been paid")]
    SalaryAlreadyPaid(Uuid),

    // ========== Collaborator Errors ==========
    /// Barber not found.
    #[error("Barber not found: {0}")]
    BarberNotFound(Uuid),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::InvalidCardNumber(_) => "INVALID_CARD_NUMBER",
            Self::InvalidSettingValue { .. } => "INVALID_SETTING_VALUE",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::DuplicateCategory { .. } => "DUPLICATE_CATEGORY",
            Self::CategoryInUse(_) => "CATEGORY_IN_USE",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::BankAccountInUse(_) => "BANK_ACCOUNT_IN_USE",
            Self::SalaryNotFound(_) => "SALARY_NOT_FOUND",
            Self::DuplicateSalary { .. } => "DUPLICATE_SALARY",
            Self::SalaryAlreadyPaid(_) => "SALARY_ALREADY_PAID",
            Self::BarberNotFound(_) => "BARBER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount
            | Self::InvalidCardNumber(_)
            | Self::InvalidSettingValue { .. }
            | Self::InvalidMonth(_) => 400,

            Self::CategoryNotFound(_)
            | Self::BankAccountNotFound(_)
            | Self::SalaryNotFound(_)
            | Self::BarberNotFound(_) => 404,

            Self::DuplicateCategory { .. }
            | Self::CategoryInUse(_)
            | Self::BankAccountInUse(_)
            | Self::DuplicateSalary { .. } => 409,

            Self::SalaryAlreadyPaid(_) => 422,

            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            LedgerError::InvalidCardNumber("too short".into()).error_code(),
            "INVALID_CARD_NUMBER"
        );
        assert_eq!(
            LedgerError::CategoryInUse(Uuid::nil()).error_code(),
            "CATEGORY_IN_USE"
        );
        assert_eq!(
            LedgerError::SalaryAlreadyPaid(Uuid::nil()).error_code(),
            "SALARY_ALREADY_PAID"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::NonPositiveAmount.http_status_code(), 400);
        assert_eq!(
            LedgerError::BankAccountNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::CategoryInUse(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::DuplicateCategory {
                name: "Service Income".into()
            }
            .http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::SalaryAlreadyPaid(Uuid::nil()).http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::Database("oops".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::NonPositiveAmount.to_string(),
            "Amount must be greater than zero"
        );
        assert_eq!(
            LedgerError::InvalidCardNumber("contains letters".into()).to_string(),
            "Malformed card number: contains letters"
        );
        let id = Uuid::nil();
        assert_eq!(
            LedgerError::CategoryInUse(id).to_string(),
            format!("Category {id} has entries and cannot be deleted")
        );
    }
}
