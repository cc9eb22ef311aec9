//! Transfer error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while transferring between bank accounts.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Source and destination are the same account.
    #[error("Cannot transfer between the same account")]
    SameAccount,

    /// Transfer amount must be positive.
    #[error("Transfer amount must be positive")]
    NonPositiveAmount,

    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl TransferError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SameAccount => "SAME_ACCOUNT",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::SameAccount | Self::NonPositiveAmount => 400,
            Self::AccountNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}
