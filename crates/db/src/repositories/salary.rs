//! Salary repository for monthly barber salaries.
//!
//! A salary record is one barber-month. Paying it books a salary
//! expense entry tagged with the salary's reference, and the record
//! flips to paid exactly once: the payment update is conditional on
//! the unpaid state, so a concurrent double pay loses cleanly.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use shearbook_core::ledger::{
    LedgerError, WellKnownCategory, salary_payment_description, salary_tag, validate_salary,
};

use crate::entities::{
    bank_accounts, barbers, financial_entries, salaries,
    sea_orm_active_enums::{
        EntryStatus as DbEntryStatus, EntryType as DbEntryType, PaymentMethod as DbPaymentMethod,
    },
};

use super::category::resolve_well_known;
use super::is_unique_violation;

/// Input for creating a salary record.
#[derive(Debug, Clone)]
pub struct CreateSalaryInput {
    /// The barber the salary belongs to.
    pub barber_id: Uuid,
    /// Salary amount, must be positive.
    pub amount: Decimal,
    /// Calendar month, 1 through 12.
    pub month: i16,
    /// Calendar year.
    pub year: i16,
    /// Optional note.
    pub description: Option<String>,
}

/// Input for updating an unpaid salary record.
#[derive(Debug, Clone, Default)]
pub struct UpdateSalaryInput {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New month.
    pub month: Option<i16>,
    /// New year.
    pub year: Option<i16>,
    /// New note.
    pub description: Option<String>,
}

/// Input for paying a salary.
#[derive(Debug, Clone, Default)]
pub struct PaySalaryInput {
    /// Bank account the expense entry is booked against, if any.
    pub bank_account_id: Option<Uuid>,
    /// Admin recording the payment.
    pub paid_by: Option<Uuid>,
}

/// Filter for listing salary records.
#[derive(Debug, Clone, Default)]
pub struct SalaryFilter {
    /// Restrict to one barber.
    pub barber_id: Option<Uuid>,
    /// Restrict to one month.
    pub month: Option<i16>,
    /// Restrict to one year.
    pub year: Option<i16>,
    /// Restrict by payment state.
    pub is_paid: Option<bool>,
}

/// A salary record joined with its barber's display name.
#[derive(Debug, Clone)]
pub struct SalaryWithBarber {
    /// The salary record.
    pub salary: salaries::Model,
    /// Display name of the barber.
    pub barber_name: String,
}

/// A paid salary together with the expense entry it booked.
#[derive(Debug, Clone)]
pub struct PaidSalary {
    /// The salary record, now paid.
    pub salary: salaries::Model,
    /// The expense entry booked for the payment.
    pub entry: financial_entries::Model,
}

/// Repository for salary records.
#[derive(Debug, Clone)]
pub struct SalaryRepository {
    db: DatabaseConnection,
}

impl SalaryRepository {
    /// Creates a new salary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an unpaid salary record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Barber is not found
    /// - Month is outside 1 through 12, or amount is not positive
    /// - A salary for this barber and month already exists
    /// - Database operation fails
    pub async fn create(&self, input: CreateSalaryInput) -> Result<salaries::Model, LedgerError> {
        barbers::Entity::find_by_id(input.barber_id)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::BarberNotFound(input.barber_id))?;

        validate_salary(input.month, input.amount)?;

        let now = Utc::now().into();
        let active = salaries::ActiveModel {
            id: Set(Uuid::now_v7()),
            barber_id: Set(input.barber_id),
            amount: Set(input.amount),
            month: Set(input.month),
            year: Set(input.year),
            is_paid: Set(false),
            paid_at: Set(None),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateSalary {
                    barber_id: input.barber_id,
                    month: input.month,
                    year: input.year,
                }
            } else {
                LedgerError::Database(e.to_string())
            }
        })
    }

    /// Lists salary records, newest period first, with barber names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, filter: SalaryFilter) -> Result<Vec<SalaryWithBarber>, LedgerError> {
        let mut query = salaries::Entity::find();
        if let Some(barber_id) = filter.barber_id {
            query = query.filter(salaries::Column::BarberId.eq(barber_id));
        }
        if let Some(month) = filter.month {
            query = query.filter(salaries::Column::Month.eq(month));
        }
        if let Some(year) = filter.year {
            query = query.filter(salaries::Column::Year.eq(year));
        }
        if let Some(is_paid) = filter.is_paid {
            query = query.filter(salaries::Column::IsPaid.eq(is_paid));
        }

        let rows = query
            .order_by_desc(salaries::Column::Year)
            .order_by_desc(salaries::Column::Month)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let barber_ids: Vec<Uuid> = rows.iter().map(|s| s.barber_id).collect();
        let barbers_by_id: HashMap<Uuid, String> = barbers::Entity::find()
            .filter(barbers::Column::Id.is_in(barber_ids))
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .into_iter()
            .map(|b| (b.id, b.full_name()))
            .collect();

        Ok(rows
            .into_iter()
            .map(|salary| {
                let barber_name = barbers_by_id
                    .get(&salary.barber_id)
                    .cloned()
                    .unwrap_or_default();
                SalaryWithBarber {
                    salary,
                    barber_name,
                }
            })
            .collect())
    }

    /// Updates an unpaid salary record.
    ///
    /// Paid salaries are locked; their amount is already in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Salary is not found
    /// - Salary has already been paid
    /// - New month or amount fails validation
    /// - The new barber-month collides with an existing salary
    /// - Database operation fails
    pub async fn update(
        &self,
        salary_id: Uuid,
        input: UpdateSalaryInput,
    ) -> Result<salaries::Model, LedgerError> {
        let salary = self.find_salary(salary_id).await?;
        if salary.is_paid {
            return Err(LedgerError::SalaryAlreadyPaid(salary_id));
        }

        let month = input.month.unwrap_or(salary.month);
        let year = input.year.unwrap_or(salary.year);
        let amount = input.amount.unwrap_or(salary.amount);
        validate_salary(month, amount)?;

        let barber_id = salary.barber_id;
        let mut active: salaries::ActiveModel = salary.into();
        active.amount = Set(amount);
        active.month = Set(month);
        active.year = Set(year);
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateSalary {
                    barber_id,
                    month,
                    year,
                }
            } else {
                LedgerError::Database(e.to_string())
            }
        })
    }

    /// Pays a salary, booking the expense entry atomically.
    ///
    /// The paid flag is flipped with a conditional update, so of two
    /// concurrent payments exactly one books an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Salary is not found
    /// - Salary has already been paid
    /// - Bank account is given but not found
    /// - Database operation fails
    pub async fn pay(&self, salary_id: Uuid, input: PaySalaryInput) -> Result<PaidSalary, LedgerError> {
        let salary = self.find_salary(salary_id).await?;
        if salary.is_paid {
            return Err(LedgerError::SalaryAlreadyPaid(salary_id));
        }

        if let Some(account_id) = input.bank_account_id {
            bank_accounts::Entity::find_by_id(account_id)
                .one(&self.db)
                .await
                .map_err(|e| LedgerError::Database(e.to_string()))?
                .ok_or(LedgerError::BankAccountNotFound(account_id))?;
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let stamped = Utc::now().into();

        let flipped = salaries::Entity::update_many()
            .col_expr(salaries::Column::IsPaid, Expr::value(true))
            .col_expr(salaries::Column::PaidAt, Expr::value(Some(stamped)))
            .col_expr(salaries::Column::UpdatedAt, Expr::value(stamped))
            .filter(salaries::Column::Id.eq(salary_id))
            .filter(salaries::Column::IsPaid.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        if flipped.rows_affected == 0 {
            return Err(LedgerError::SalaryAlreadyPaid(salary_id));
        }

        let category = resolve_well_known(&txn, WellKnownCategory::SalaryExpense).await?;

        let entry = financial_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            amount: Set(salary.amount),
            entry_type: Set(DbEntryType::Expense),
            entry_date: Set(stamped),
            description: Set(salary_payment_description(salary.month, salary.year)),
            category_id: Set(category.id),
            bank_account_id: Set(input.bank_account_id),
            reference: Set(Some(salary_tag(salary_id))),
            source_appointment_id: Set(None),
            source_withdrawal_id: Set(None),
            payment_method: Set(DbPaymentMethod::Cash),
            created_by: Set(input.paid_by),
            status: Set(DbEntryStatus::Completed),
            created_at: Set(stamped),
            updated_at: Set(stamped),
        };
        let entry = entry
            .insert(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let salary = self.find_salary(salary_id).await?;
        Ok(PaidSalary { salary, entry })
    }

    /// Deletes a salary record and, if paid, its expense entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Salary is not found
    /// - Database operation fails
    pub async fn delete(&self, salary_id: Uuid) -> Result<(), LedgerError> {
        let salary = self.find_salary(salary_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        financial_entries::Entity::delete_many()
            .filter(financial_entries::Column::Reference.eq(salary_tag(salary_id)))
            .exec(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        salary
            .delete(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_salary(&self, salary_id: Uuid) -> Result<salaries::Model, LedgerError> {
        salaries::Entity::find_by_id(salary_id)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::SalaryNotFound(salary_id))
    }
}
