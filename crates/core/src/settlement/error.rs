//! Settlement error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::AppointmentStatus;

/// Errors that can occur while settling or reversing an appointment.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Appointment not found.
    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    /// The appointment already has settlement rows.
    #[error("Appointment {0} is already settled")]
    AlreadySettled(Uuid),

    /// The appointment's status does not allow settlement.
    #[error("Appointment in status {status} cannot be settled")]
    NotSettleable {
        /// The blocking status.
        status: AppointmentStatus,
    },

    /// Reversal requested for an appointment with no settlement rows.
    #[error("Appointment {0} is not settled")]
    NotSettled(Uuid),

    /// Reversal requested for an appointment that is not completed.
    #[error("Only completed appointments can be cancelled, status is {status}")]
    CancelRequiresCompleted {
        /// The blocking status.
        status: AppointmentStatus,
    },

    /// Deletion requested for a settled appointment.
    #[error("Appointment {0} is settled; cancel the settlement before deleting")]
    SettledAppointmentLocked(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AppointmentNotFound(_) => "APPOINTMENT_NOT_FOUND",
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::NotSettleable { .. } => "NOT_SETTLEABLE",
            Self::NotSettled(_) => "NOT_SETTLED",
            Self::CancelRequiresCompleted { .. } => "CANCEL_REQUIRES_COMPLETED",
            Self::SettledAppointmentLocked(_) => "SETTLED_APPOINTMENT_LOCKED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::AppointmentNotFound(_) => 404,

            Self::AlreadySettled(_)
            | Self::NotSettleable { .. }
            | Self::NotSettled(_)
            | Self::CancelRequiresCompleted { .. } => 422,

            Self::SettledAppointmentLocked(_) => 409,

            Self::Database(_) => 500,
        }
    }
}
