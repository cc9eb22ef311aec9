//! Appointment settlement logic.
//!
//! This module decides when an appointment can be settled, reversed, or
//! deleted, and computes the ledger legs a settlement produces:
//! - Appointment status rules and snapshots
//! - Settlement plans (service amount, tip amount, ledger legs)
//! - Status update actions (settle, reverse, plain status change)
//! - Error types for settlement operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::SettlementError;
pub use service::SettlementService;
pub use types::{
    AppointmentSnapshot, AppointmentStatus, SettlementLeg, SettlementPlan, SettlementRequest,
    UpdateAction,
};
