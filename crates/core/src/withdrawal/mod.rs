//! Barber balances and the withdrawal workflow.
//!
//! Barbers earn income through settled appointments and draw it down via
//! withdrawal requests:
//! - Derived barber balances (income minus approved withdrawals)
//! - Withdrawal request validation and status transitions
//! - Error types for withdrawal operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

pub use balance::{
    AppointmentIncome, AppointmentRef, BarberBalance, BarberRef, WithdrawalRef, barber_balance,
    barbers_balances,
};
pub use error::WithdrawalError;
pub use service::WithdrawalService;
pub use types::WithdrawalStatus;
