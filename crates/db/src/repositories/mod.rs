//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod appointment;
pub mod bank_account;
pub mod category;
pub mod salary;
pub mod setting;
pub mod withdrawal;

pub use appointment::{
    AppointmentRepository, SettlementOutcome, UpdateAppointmentInput, UpdateOutcome,
};
pub use bank_account::{
    BankAccountRepository, BankAccountWithBalance, CreateBankAccountInput, TransferInput,
    TransferOutcome, UpdateBankAccountInput,
};
pub use category::{CategoryRepository, CreateCategoryInput};
pub use salary::{
    CreateSalaryInput, PaidSalary, PaySalaryInput, SalaryFilter, SalaryRepository,
    SalaryWithBarber, UpdateSalaryInput,
};
pub use setting::SettingRepository;
pub use withdrawal::{
    ApproveWithdrawalInput, ApprovedWithdrawal, RequestWithdrawalInput, UpdateWithdrawalInput,
    WithdrawalRepository, WithdrawalWithPayout,
};

use sea_orm::{DbErr, SqlErr};

/// True when the error is a unique constraint violation.
///
/// The write paths lean on unique indexes to close races; this is how
/// the losing side of a race recognizes its loss.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
