//! `SeaORM` entity definitions.

pub mod appointment_services;
pub mod appointments;
pub mod bank_accounts;
pub mod barbers;
pub mod customers;
pub mod financial_categories;
pub mod financial_entries;
pub mod salaries;
pub mod sea_orm_active_enums;
pub mod services;
pub mod settings;
pub mod transactions;
pub mod withdrawal_requests;
