//! Withdrawal repository for the barber payout workflow.
//!
//! Requests move pending -> approved or pending -> rejected. Approval is
//! the only transition that writes a ledger entry; the unique index on
//! the entry's source column makes a double approval impossible.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use shearbook_core::ledger::{WellKnownCategory, withdrawal_tag};
use shearbook_core::withdrawal::{
    AppointmentIncome, AppointmentRef, BarberBalance, BarberRef, WithdrawalError, WithdrawalRef,
    WithdrawalService, WithdrawalStatus, barber_balance, barbers_balances,
};

use crate::entities::{
    appointments, bank_accounts, barbers, financial_entries,
    sea_orm_active_enums::{
        EntryStatus as DbEntryStatus, EntryType as DbEntryType, PaymentMethod as DbPaymentMethod,
        WithdrawalStatus as DbWithdrawalStatus,
    },
    withdrawal_requests,
};

use super::category::resolve_well_known;
use super::is_unique_violation;

/// Input for requesting a withdrawal.
#[derive(Debug, Clone)]
pub struct RequestWithdrawalInput {
    /// The barber drawing down their balance.
    pub barber_id: Uuid,
    /// Requested amount, must be positive and within the balance.
    pub amount: Decimal,
    /// Optional note.
    pub description: Option<String>,
}

/// Input for approving a withdrawal.
#[derive(Debug, Clone)]
pub struct ApproveWithdrawalInput {
    /// Admin approving the request.
    pub approved_by: Uuid,
    /// Bank account the payout entry is booked against, if any.
    pub bank_account_id: Option<Uuid>,
}

/// Input for updating a withdrawal request.
#[derive(Debug, Clone, Default)]
pub struct UpdateWithdrawalInput {
    /// New amount; the payout entry follows in lockstep when approved.
    pub amount: Option<Decimal>,
    /// New bank account on the payout entry.
    pub bank_account_id: Option<Uuid>,
    /// New note on the request and the payout entry.
    pub description: Option<String>,
}

/// An approved request together with the payout entry it wrote.
#[derive(Debug, Clone)]
pub struct ApprovedWithdrawal {
    /// The request, now approved.
    pub request: withdrawal_requests::Model,
    /// The expense entry booked for the payout.
    pub entry: financial_entries::Model,
}

/// A withdrawal request joined with its payout state.
#[derive(Debug, Clone)]
pub struct WithdrawalWithPayout {
    /// The request record.
    pub request: withdrawal_requests::Model,
    /// Display name of the requesting barber.
    pub barber_name: String,
    /// Whether a payout entry exists for the request.
    pub paid: bool,
    /// When the payout entry was booked.
    pub paid_at: Option<DateTime<FixedOffset>>,
    /// Bank account on the payout entry, if any.
    pub bank_account: Option<bank_accounts::Model>,
}

/// Repository for withdrawal requests and barber balances.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    db: DatabaseConnection,
}

impl WithdrawalRepository {
    /// Creates a new withdrawal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the derived balance of every barber.
    ///
    /// Income comes from settlement entries of completed appointments;
    /// only approved withdrawals count against it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn barbers_balances(&self) -> Result<Vec<BarberBalance>, WithdrawalError> {
        let barber_rows = barbers::Entity::find()
            .order_by_asc(barbers::Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        let barber_refs: Vec<BarberRef> = barber_rows
            .iter()
            .map(|b| BarberRef {
                id: b.id,
                name: b.full_name(),
            })
            .collect();

        let (appointment_refs, incomes) = self.load_income_inputs().await?;
        let withdrawal_refs = self.load_withdrawal_refs().await?;

        Ok(barbers_balances(
            &barber_refs,
            &appointment_refs,
            &incomes,
            &withdrawal_refs,
        ))
    }

    /// Computes the derived balance of one barber.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Barber is not found
    /// - Database operation fails
    pub async fn barber_balance(&self, barber_id: Uuid) -> Result<BarberBalance, WithdrawalError> {
        let barber = barbers::Entity::find_by_id(barber_id)
            .one(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .ok_or(WithdrawalError::BarberNotFound(barber_id))?;

        let (appointment_refs, incomes) = self.load_income_inputs().await?;
        let withdrawal_refs = self.load_withdrawal_refs().await?;

        Ok(barber_balance(
            &BarberRef {
                id: barber.id,
                name: barber.full_name(),
            },
            &appointment_refs,
            &incomes,
            &withdrawal_refs,
        ))
    }

    /// Creates a pending withdrawal request.
    ///
    /// The amount is capped at the barber's balance at request time.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Barber is not found
    /// - Amount is not positive
    /// - Amount exceeds the barber's available balance
    /// - Database operation fails
    pub async fn request(
        &self,
        input: RequestWithdrawalInput,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let balance = self.barber_balance(input.barber_id).await?;
        WithdrawalService::validate_request(input.amount, balance.balance)?;

        let now = Utc::now().into();
        let active = withdrawal_requests::ActiveModel {
            id: Set(Uuid::now_v7()),
            barber_id: Set(input.barber_id),
            amount: Set(input.amount),
            status: Set(DbWithdrawalStatus::Pending),
            approved_by: Set(None),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active
            .insert(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))
    }

    /// Approves a pending request and books the payout entry.
    ///
    /// The request flips to approved and a salary expense entry is
    /// written in the same transaction. A concurrent double approval
    /// loses on the unique payout index and rolls back whole.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - Request is not pending
    /// - Bank account is given but not found
    /// - Database operation fails
    pub async fn approve(
        &self,
        withdrawal_id: Uuid,
        input: ApproveWithdrawalInput,
    ) -> Result<ApprovedWithdrawal, WithdrawalError> {
        let request = self.find_request(withdrawal_id).await?;
        WithdrawalService::validate_approve(request.status.clone().into())?;

        let barber = barbers::Entity::find_by_id(request.barber_id)
            .one(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .ok_or(WithdrawalError::BarberNotFound(request.barber_id))?;

        if let Some(account_id) = input.bank_account_id {
            bank_accounts::Entity::find_by_id(account_id)
                .one(&self.db)
                .await
                .map_err(|e| WithdrawalError::Database(e.to_string()))?
                .ok_or(WithdrawalError::BankAccountNotFound(account_id))?;
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let category = resolve_well_known(&txn, WellKnownCategory::SalaryExpense)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let stamped = Utc::now().into();

        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(DbWithdrawalStatus::Approved);
        active.approved_by = Set(Some(input.approved_by));
        active.updated_at = Set(stamped);
        let request = active
            .update(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let entry = financial_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            amount: Set(request.amount),
            entry_type: Set(DbEntryType::Expense),
            entry_date: Set(stamped),
            description: Set(WithdrawalService::payout_description(&barber.full_name())),
            category_id: Set(category.id),
            bank_account_id: Set(input.bank_account_id),
            reference: Set(Some(withdrawal_tag(withdrawal_id))),
            source_appointment_id: Set(None),
            source_withdrawal_id: Set(Some(withdrawal_id)),
            payment_method: Set(DbPaymentMethod::Cash),
            created_by: Set(Some(input.approved_by)),
            status: Set(DbEntryStatus::Completed),
            created_at: Set(stamped),
            updated_at: Set(stamped),
        };
        let entry = entry.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                WithdrawalError::InvalidTransition {
                    from: WithdrawalStatus::Approved,
                    to: WithdrawalStatus::Approved,
                }
            } else {
                WithdrawalError::Database(e.to_string())
            }
        })?;

        txn.commit()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        Ok(ApprovedWithdrawal { request, entry })
    }

    /// Rejects a pending request. No ledger entry is written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - Request is not pending
    /// - Database operation fails
    pub async fn reject(
        &self,
        withdrawal_id: Uuid,
        rejected_by: Uuid,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let request = self.find_request(withdrawal_id).await?;
        WithdrawalService::validate_reject(request.status.clone().into())?;

        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(DbWithdrawalStatus::Rejected);
        active.approved_by = Set(Some(rejected_by));
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))
    }

    /// Updates a request, keeping any payout entry in lockstep.
    ///
    /// The new amount is validated against the barber's balance. An
    /// approved request's current amount is already counted as
    /// withdrawn, so it is available again when resizing that request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - New amount is not positive or exceeds the available balance
    /// - Bank account is given but not found
    /// - Database operation fails
    pub async fn update(
        &self,
        withdrawal_id: Uuid,
        input: UpdateWithdrawalInput,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let request = self.find_request(withdrawal_id).await?;

        let new_amount = input.amount.unwrap_or(request.amount);
        let balance = self.barber_balance(request.barber_id).await?;
        let available = if matches!(request.status, DbWithdrawalStatus::Approved) {
            balance.balance + request.amount
        } else {
            balance.balance
        };
        WithdrawalService::validate_request(new_amount, available)?;

        if let Some(account_id) = input.bank_account_id {
            bank_accounts::Entity::find_by_id(account_id)
                .one(&self.db)
                .await
                .map_err(|e| WithdrawalError::Database(e.to_string()))?
                .ok_or(WithdrawalError::BankAccountNotFound(account_id))?;
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let stamped = Utc::now().into();

        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.amount = Set(new_amount);
        if let Some(description) = input.description.clone() {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(stamped);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        if let Some(entry) = financial_entries::Entity::find()
            .filter(financial_entries::Column::SourceWithdrawalId.eq(withdrawal_id))
            .one(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
        {
            let mut entry_active: financial_entries::ActiveModel = entry.into();
            entry_active.amount = Set(new_amount);
            if let Some(account_id) = input.bank_account_id {
                entry_active.bank_account_id = Set(Some(account_id));
            }
            if let Some(description) = input.description {
                entry_active.description = Set(description);
            }
            entry_active.updated_at = Set(stamped);
            entry_active
                .update(&txn)
                .await
                .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Deletes a request and any payout entry it produced.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - Database operation fails
    pub async fn delete(&self, withdrawal_id: Uuid) -> Result<(), WithdrawalError> {
        let request = self.find_request(withdrawal_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        financial_entries::Entity::delete_many()
            .filter(financial_entries::Column::SourceWithdrawalId.eq(withdrawal_id))
            .exec(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        request
            .delete(&txn)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        Ok(())
    }

    /// Lists requests newest first, joined with their payout state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        status: Option<WithdrawalStatus>,
    ) -> Result<Vec<WithdrawalWithPayout>, WithdrawalError> {
        let mut query = withdrawal_requests::Entity::find();
        if let Some(status) = status {
            let status: DbWithdrawalStatus = status.into();
            query = query.filter(withdrawal_requests::Column::Status.eq(status));
        }
        let requests = query
            .order_by_desc(withdrawal_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let barber_ids: Vec<Uuid> = requests.iter().map(|r| r.barber_id).collect();
        let barbers_by_id: HashMap<Uuid, String> = barbers::Entity::find()
            .filter(barbers::Column::Id.is_in(barber_ids))
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .into_iter()
            .map(|b| (b.id, b.full_name()))
            .collect();

        let request_ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
        let entries = financial_entries::Entity::find()
            .filter(financial_entries::Column::SourceWithdrawalId.is_in(request_ids))
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;

        let account_ids: Vec<Uuid> = entries.iter().filter_map(|e| e.bank_account_id).collect();
        let accounts_by_id: HashMap<Uuid, bank_accounts::Model> = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut entries_by_request: HashMap<Uuid, financial_entries::Model> = HashMap::new();
        for entry in entries {
            if let Some(source_id) = entry.source_withdrawal_id {
                entries_by_request.insert(source_id, entry);
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| {
                let barber_name = barbers_by_id
                    .get(&request.barber_id)
                    .cloned()
                    .unwrap_or_default();
                let entry = entries_by_request.remove(&request.id);
                let bank_account = entry
                    .as_ref()
                    .and_then(|e| e.bank_account_id)
                    .and_then(|id| accounts_by_id.get(&id).cloned());
                WithdrawalWithPayout {
                    barber_name,
                    paid: entry.is_some(),
                    paid_at: entry.map(|e| e.entry_date),
                    bank_account,
                    request,
                }
            })
            .collect())
    }

    async fn find_request(
        &self,
        withdrawal_id: Uuid,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        withdrawal_requests::Entity::find_by_id(withdrawal_id)
            .one(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?
            .ok_or(WithdrawalError::RequestNotFound(withdrawal_id))
    }

    async fn load_income_inputs(
        &self,
    ) -> Result<(Vec<AppointmentRef>, Vec<AppointmentIncome>), WithdrawalError> {
        let appointment_rows = appointments::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        let refs = appointment_rows
            .iter()
            .map(|a| AppointmentRef {
                id: a.id,
                barber_id: a.barber_id,
                status: a.status.clone().into(),
            })
            .collect();

        let entries = financial_entries::Entity::find()
            .filter(financial_entries::Column::SourceAppointmentId.is_not_null())
            .filter(financial_entries::Column::EntryType.eq(DbEntryType::Income))
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        let incomes = entries
            .into_iter()
            .filter_map(|e| {
                e.source_appointment_id.map(|appointment_id| AppointmentIncome {
                    appointment_id,
                    amount: e.amount,
                })
            })
            .collect();

        Ok((refs, incomes))
    }

    async fn load_withdrawal_refs(&self) -> Result<Vec<WithdrawalRef>, WithdrawalError> {
        let rows = withdrawal_requests::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| WithdrawalError::Database(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|r| WithdrawalRef {
                barber_id: r.barber_id,
                amount: r.amount,
                status: r.status.into(),
            })
            .collect())
    }
}
