//! Reference tags linking ledger entries to their originating records.
//!
//! Entries carry explicit source columns, but the dashboard still reads
//! the legacy free-text tags, so both are written in lockstep. The tag
//! formats here are a persisted contract and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix for appointment settlement entries.
pub const APPOINTMENT_PREFIX: &str = "APPT-";
/// Prefix for withdrawal payout entries.
pub const WITHDRAWAL_PREFIX: &str = "WITHDRAWAL-";
/// Prefix for salary payment entries.
pub const SALARY_PREFIX: &str = "SALARY-";

/// A parsed reference tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceTag {
    /// Entry created by settling an appointment.
    Appointment(Uuid),
    /// Entry created by approving a withdrawal request.
    Withdrawal(Uuid),
    /// Entry created by paying a salary.
    Salary(Uuid),
}

impl ReferenceTag {
    /// Parses a reference string back into a tag.
    pub fn parse(reference: &str) -> Option<Self> {
        if let Some(rest) = reference.strip_prefix(APPOINTMENT_PREFIX) {
            return Uuid::parse_str(rest).ok().map(Self::Appointment);
        }
        if let Some(rest) = reference.strip_prefix(WITHDRAWAL_PREFIX) {
            return Uuid::parse_str(rest).ok().map(Self::Withdrawal);
        }
        if let Some(rest) = reference.strip_prefix(SALARY_PREFIX) {
            return Uuid::parse_str(rest).ok().map(Self::Salary);
        }
        None
    }

    /// The id of the originating record.
    #[must_use]
    pub const fn source_id(&self) -> Uuid {
        match self {
            Self::Appointment(id) | Self::Withdrawal(id) | Self::Salary(id) => *id,
        }
    }
}

impl fmt::Display for ReferenceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appointment(id) => write!(f, "{APPOINTMENT_PREFIX}{id}"),
            Self::Withdrawal(id) => write!(f, "{WITHDRAWAL_PREFIX}{id}"),
            Self::Salary(id) => write!(f, "{SALARY_PREFIX}{id}"),
        }
    }
}

/// Formats the settlement tag for an appointment.
#[must_use]
pub fn appointment_tag(appointment_id: Uuid) -> String {
    ReferenceTag::Appointment(appointment_id).to_string()
}

/// Formats the payout tag for a withdrawal request.
#[must_use]
pub fn withdrawal_tag(withdrawal_id: Uuid) -> String {
    ReferenceTag::Withdrawal(withdrawal_id).to_string()
}

/// Formats the payment tag for a salary record.
#[must_use]
pub fn salary_tag(salary_id: Uuid) -> String {
    ReferenceTag::Salary(salary_id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_format_is_bit_exact() {
        let id = Uuid::parse_str("0191a0c0-1111-7000-8000-000000000007").unwrap();
        assert_eq!(
            appointment_tag(id),
            "APPT-0191a0c0-1111-7000-8000-000000000007"
        );
        assert_eq!(
            withdrawal_tag(id),
            "WITHDRAWAL-0191a0c0-1111-7000-8000-000000000007"
        );
        assert_eq!(
            salary_tag(id),
            "SALARY-0191a0c0-1111-7000-8000-000000000007"
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = Uuid::new_v4();
        assert_eq!(
            ReferenceTag::parse(&appointment_tag(id)),
            Some(ReferenceTag::Appointment(id))
        );
        assert_eq!(
            ReferenceTag::parse(&withdrawal_tag(id)),
            Some(ReferenceTag::Withdrawal(id))
        );
        assert_eq!(
            ReferenceTag::parse(&salary_tag(id)),
            Some(ReferenceTag::Salary(id))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ReferenceTag::parse(""), None);
        assert_eq!(ReferenceTag::parse("APPT-"), None);
        assert_eq!(ReferenceTag::parse("APPT-not-a-uuid"), None);
        assert_eq!(ReferenceTag::parse("INVOICE-123"), None);
        // Prefixes are case-sensitive by contract.
        assert_eq!(
            ReferenceTag::parse(&format!("appt-{}", Uuid::new_v4())),
            None
        );
    }

    #[test]
    fn test_source_id() {
        let id = Uuid::new_v4();
        assert_eq!(ReferenceTag::Appointment(id).source_id(), id);
        assert_eq!(ReferenceTag::Withdrawal(id).source_id(), id);
    }
}
