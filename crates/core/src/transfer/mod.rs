//! Bank-to-bank transfers.
//!
//! A transfer moves money between two bank accounts as a pair of
//! transaction rows written in the same database transaction:
//! - Transfer planning (validation plus the two legs)
//! - Error types for transfer operations

pub mod error;
pub mod service;

pub use error::TransferError;
pub use service::{TransferAccount, TransferLeg, TransferPlan, TransferService};
