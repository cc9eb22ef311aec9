//! Withdrawal request domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a barber withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Waiting for an admin decision.
    Pending,
    /// Approved and paid out; an expense entry exists for it.
    Approved,
    /// Rejected without any ledger effect.
    Rejected,
}

impl WithdrawalStatus {
    /// Returns the status as a lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from its lowercase string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether the request is still awaiting a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            WithdrawalStatus::Pending,
            WithdrawalStatus::Approved,
            WithdrawalStatus::Rejected,
        ] {
            assert_eq!(WithdrawalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WithdrawalStatus::parse("paid"), None);
    }

    #[test]
    fn test_only_pending_is_pending() {
        assert!(WithdrawalStatus::Pending.is_pending());
        assert!(!WithdrawalStatus::Approved.is_pending());
        assert!(!WithdrawalStatus::Rejected.is_pending());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&WithdrawalStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
