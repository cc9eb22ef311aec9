//! Withdrawal error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::WithdrawalStatus;

/// Errors that can occur in the withdrawal workflow.
#[derive(Debug, Error)]
pub enum WithdrawalError {
    /// Withdrawal request not found.
    #[error("Withdrawal request not found: {0}")]
    RequestNotFound(Uuid),

    /// Barber not found.
    #[error("Barber not found: {0}")]
    BarberNotFound(Uuid),

    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

    /// The request is not in a status that allows this transition.
    #[error("Cannot move withdrawal from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: WithdrawalStatus,
        /// Requested status.
        to: WithdrawalStatus,
    },

    /// Withdrawal amount must be positive.
    #[error("Withdrawal amount must be positive")]
    NonPositiveAmount,

    /// The requested amount exceeds the barber's available balance.
    #[error("Requested {requested} exceeds available balance {available}")]
    ExceedsBalance {
        /// Amount the barber asked for.
        requested: Decimal,
        /// Balance available at the time of the request.
        available: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WithdrawalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RequestNotFound(_) => "WITHDRAWAL_NOT_FOUND",
            Self::BarberNotFound(_) => "BARBER_NOT_FOUND",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ExceedsBalance { .. } => "EXCEEDS_BALANCE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::RequestNotFound(_) | Self::BarberNotFound(_) | Self::BankAccountNotFound(_) => {
                404
            }

            Self::NonPositiveAmount => 400,

            Self::InvalidTransition { .. } | Self::ExceedsBalance { .. } => 422,

            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WithdrawalError::RequestNotFound(Uuid::nil()).error_code(),
            "WITHDRAWAL_NOT_FOUND"
        );
        assert_eq!(
            WithdrawalError::ExceedsBalance {
                requested: dec!(800000),
                available: dec!(700000),
            }
            .error_code(),
            "EXCEEDS_BALANCE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            WithdrawalError::BarberNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(WithdrawalError::NonPositiveAmount.http_status_code(), 400);
        assert_eq!(
            WithdrawalError::InvalidTransition {
                from: WithdrawalStatus::Approved,
                to: WithdrawalStatus::Rejected,
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            WithdrawalError::Database("oops".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_exceeds_balance_display() {
        let err = WithdrawalError::ExceedsBalance {
            requested: dec!(800000),
            available: dec!(700000),
        };
        assert_eq!(
            err.to_string(),
            "Requested 800000 exceeds available balance 700000"
        );
    }
}
