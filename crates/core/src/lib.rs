//! Core business logic for Shearbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Financial entries, categories, balances, and references
//! - `settlement` - Appointment settlement planning and reversal rules
//! - `transfer` - Bank-to-bank transfer planning
//! - `withdrawal` - Barber balances and the withdrawal workflow

pub mod ledger;
pub mod settlement;
pub mod transfer;
pub mod withdrawal;
