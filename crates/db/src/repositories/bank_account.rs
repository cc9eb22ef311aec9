//! Bank account repository with derived balances and transfers.
//!
//! Account balances are never stored. Every read recomputes them from
//! the entries and transfer legs referencing the account, so the ledger
//! stays the single source of truth.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use shearbook_core::ledger::{
    AccountBalance, EntryType, FlowDirection, LedgerError, account_balance, normalize_card_number,
};
use shearbook_core::transfer::{
    TransferAccount, TransferError, TransferLeg, TransferPlan, TransferService,
};

use crate::entities::{
    bank_accounts, financial_entries,
    sea_orm_active_enums::{
        EntryStatus as DbEntryStatus, PaymentMethod as DbPaymentMethod,
        TransactionCategory as DbTransactionCategory, TransactionKind as DbTransactionKind,
    },
    transactions,
};

/// Input for creating a bank account.
#[derive(Debug, Clone)]
pub struct CreateBankAccountInput {
    /// Display name.
    pub name: String,
    /// Card number; normalized to 16 digits before storage.
    pub card_number: String,
}

/// Input for updating a bank account.
#[derive(Debug, Clone, Default)]
pub struct UpdateBankAccountInput {
    /// New display name.
    pub name: Option<String>,
    /// New card number; normalized to 16 digits before storage.
    pub card_number: Option<String>,
}

/// A bank account together with its derived balance.
#[derive(Debug, Clone)]
pub struct BankAccountWithBalance {
    /// The account record.
    pub account: bank_accounts::Model,
    /// Balance derived from the ledger at read time.
    pub balance: AccountBalance,
}

/// Input for a bank-to-bank transfer.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Amount to move, must be positive.
    pub amount: Decimal,
    /// Optional note appended to both leg descriptions.
    pub description: Option<String>,
}

/// The two transaction rows written by a transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// Outflow leg on the source account.
    pub outgoing: transactions::Model,
    /// Inflow leg on the destination account.
    pub incoming: transactions::Model,
}

/// Repository for bank accounts.
#[derive(Debug, Clone)]
pub struct BankAccountRepository {
    db: DatabaseConnection,
}

impl BankAccountRepository {
    /// Creates a new bank account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Card number does not normalize to 16 digits
    /// - Database operation fails
    pub async fn create(
        &self,
        input: CreateBankAccountInput,
    ) -> Result<bank_accounts::Model, LedgerError> {
        let card_number = normalize_card_number(&input.card_number)?;
        let now = Utc::now().into();
        let active = bank_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            card_number: Set(card_number),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active
            .insert(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Fetches a bank account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account is not found
    /// - Database operation fails
    pub async fn get(&self, id: Uuid) -> Result<bank_accounts::Model, LedgerError> {
        bank_accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::BankAccountNotFound(id))
    }

    /// Fetches a bank account with its derived balance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account is not found
    /// - Database operation fails
    pub async fn get_with_balance(&self, id: Uuid) -> Result<BankAccountWithBalance, LedgerError> {
        let account = self.get(id).await?;
        let balance = self.load_balance(id).await?;
        Ok(BankAccountWithBalance { account, balance })
    }

    /// Lists all bank accounts with derived balances, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_with_balances(&self) -> Result<Vec<BankAccountWithBalance>, LedgerError> {
        let accounts = bank_accounts::Entity::find()
            .order_by_asc(bank_accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let entries = financial_entries::Entity::find()
            .filter(financial_entries::Column::BankAccountId.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let transfers = transactions::Entity::find()
            .filter(transactions::Column::TransactionType.eq(DbTransactionKind::Transfer))
            .filter(transactions::Column::BankAccountId.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let mut entries_by_account: HashMap<Uuid, Vec<(EntryType, Decimal)>> = HashMap::new();
        for entry in entries {
            if let Some(account_id) = entry.bank_account_id {
                entries_by_account
                    .entry(account_id)
                    .or_default()
                    .push((entry.entry_type.into(), entry.amount));
            }
        }

        let mut transfers_by_account: HashMap<Uuid, Vec<(FlowDirection, Decimal)>> = HashMap::new();
        for leg in transfers {
            if let Some(account_id) = leg.bank_account_id {
                transfers_by_account
                    .entry(account_id)
                    .or_default()
                    .push((leg.direction.into(), leg.amount));
            }
        }

        Ok(accounts
            .into_iter()
            .map(|account| {
                let entry_rows = entries_by_account.remove(&account.id).unwrap_or_default();
                let transfer_rows = transfers_by_account.remove(&account.id).unwrap_or_default();
                let balance = account_balance(account.id, &entry_rows, &transfer_rows);
                BankAccountWithBalance { account, balance }
            })
            .collect())
    }

    /// Updates a bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account is not found
    /// - Card number does not normalize to 16 digits
    /// - Database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateBankAccountInput,
    ) -> Result<bank_accounts::Model, LedgerError> {
        let account = self.get(id).await?;

        let mut active: bank_accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(card_number) = input.card_number {
            active.card_number = Set(normalize_card_number(&card_number)?);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Deletes a bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account is not found
    /// - Entries or transactions still reference the account
    /// - Database operation fails
    pub async fn delete(&self, id: Uuid) -> Result<(), LedgerError> {
        let account = self.get(id).await?;

        let entry_count = financial_entries::Entity::find()
            .filter(financial_entries::Column::BankAccountId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::BankAccountId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        if entry_count > 0 || transaction_count > 0 {
            return Err(LedgerError::BankAccountInUse(id));
        }

        account
            .delete(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(())
    }

    /// Moves money between two bank accounts.
    ///
    /// Writes one outflow and one inflow transaction row atomically,
    /// both stamped with the same timestamp. The legs sum to zero
    /// across accounts, so a transfer never changes total holdings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source and destination are the same account
    /// - Amount is not positive
    /// - Either account is not found
    /// - Database operation fails
    pub async fn transfer(&self, input: TransferInput) -> Result<TransferOutcome, TransferError> {
        let from = bank_accounts::Entity::find_by_id(input.from_account_id)
            .one(&self.db)
            .await
            .map_err(|e| TransferError::Database(e.to_string()))?
            .ok_or(TransferError::AccountNotFound(input.from_account_id))?;
        let to = bank_accounts::Entity::find_by_id(input.to_account_id)
            .one(&self.db)
            .await
            .map_err(|e| TransferError::Database(e.to_string()))?
            .ok_or(TransferError::AccountNotFound(input.to_account_id))?;

        let plan = TransferService::plan(
            &TransferAccount {
                id: from.id,
                name: from.name,
            },
            &TransferAccount {
                id: to.id,
                name: to.name,
            },
            input.amount,
            input.description.as_deref(),
            Utc::now(),
        )?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TransferError::Database(e.to_string()))?;

        let [out_leg, in_leg] = &plan.legs;
        let outgoing = insert_leg(&txn, &plan, out_leg).await?;
        let incoming = insert_leg(&txn, &plan, in_leg).await?;

        txn.commit()
            .await
            .map_err(|e| TransferError::Database(e.to_string()))?;

        Ok(TransferOutcome { outgoing, incoming })
    }

    async fn load_balance(&self, account_id: Uuid) -> Result<AccountBalance, LedgerError> {
        let entries = financial_entries::Entity::find()
            .filter(financial_entries::Column::BankAccountId.eq(account_id))
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let transfers = transactions::Entity::find()
            .filter(transactions::Column::BankAccountId.eq(account_id))
            .filter(transactions::Column::TransactionType.eq(DbTransactionKind::Transfer))
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let entry_rows: Vec<(EntryType, Decimal)> = entries
            .into_iter()
            .map(|e| (e.entry_type.into(), e.amount))
            .collect();
        let transfer_rows: Vec<(FlowDirection, Decimal)> = transfers
            .into_iter()
            .map(|t| (t.direction.into(), t.amount))
            .collect();

        Ok(account_balance(account_id, &entry_rows, &transfer_rows))
    }
}

async fn insert_leg<C: ConnectionTrait>(
    conn: &C,
    plan: &TransferPlan,
    leg: &TransferLeg,
) -> Result<transactions::Model, TransferError> {
    let stamped = plan.transferred_at.into();
    let active = transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        appointment_id: Set(None),
        bank_account_id: Set(Some(leg.account_id)),
        amount: Set(plan.amount),
        direction: Set(leg.direction.into()),
        transaction_type: Set(DbTransactionKind::Transfer),
        category: Set(DbTransactionCategory::Other),
        status: Set(DbEntryStatus::Completed),
        payment_method: Set(DbPaymentMethod::Transfer),
        description: Set(Some(leg.description.clone())),
        created_at: Set(stamped),
        updated_at: Set(stamped),
    };

    active
        .insert(conn)
        .await
        .map_err(|e| TransferError::Database(e.to_string()))
}
