//! Settings repository for shop-level key/value settings.
//!
//! The one setting the ledger cares about is the default settlement
//! bank account: when set, settlement entries are stamped with it.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use shearbook_core::ledger::LedgerError;

use crate::entities::{bank_accounts, settings};

/// Key of the setting holding the default settlement bank account id.
///
/// An empty value means unset.
pub(crate) const DEFAULT_SETTLEMENT_ACCOUNT_KEY: &str = "default_settlement_bank_account_id";

/// Reads the default settlement bank account, if one is configured.
///
/// Generic over the connection so the settlement path can read it inside
/// its own transaction. A stale value pointing at a deleted account
/// reads as unset rather than poisoning every settlement.
pub(crate) async fn default_settlement_account<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<bank_accounts::Model>, LedgerError> {
    let Some(setting) = settings::Entity::find_by_id(DEFAULT_SETTLEMENT_ACCOUNT_KEY)
        .one(conn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?
    else {
        return Ok(None);
    };

    if setting.value.is_empty() {
        return Ok(None);
    }

    let account_id =
        Uuid::parse_str(&setting.value).map_err(|_| LedgerError::InvalidSettingValue {
            key: DEFAULT_SETTLEMENT_ACCOUNT_KEY.to_string(),
            value: setting.value.clone(),
        })?;

    bank_accounts::Entity::find_by_id(account_id)
        .one(conn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))
}

/// Repository for shop settings.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    db: DatabaseConnection,
}

impl SettingRepository {
    /// Creates a new setting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches a setting by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, key: &str) -> Result<Option<settings::Model>, LedgerError> {
        settings::Entity::find_by_id(key)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Lists all settings, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<settings::Model>, LedgerError> {
        settings::Entity::find()
            .order_by_asc(settings::Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Upserts a setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<settings::Model, LedgerError> {
        let now = Utc::now().into();
        let active = settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        settings::Entity::insert(active)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Fetches the configured default settlement bank account.
    ///
    /// Returns `None` when unset, set to empty, or pointing at an
    /// account that no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stored value is not a valid UUID
    /// - Database operation fails
    pub async fn default_settlement_account(
        &self,
    ) -> Result<Option<bank_accounts::Model>, LedgerError> {
        default_settlement_account(&self.db).await
    }

    /// Sets or clears the default settlement bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist
    /// - Database operation fails
    pub async fn set_default_settlement_account(
        &self,
        account_id: Option<Uuid>,
    ) -> Result<(), LedgerError> {
        let value = match account_id {
            Some(id) => {
                bank_accounts::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(|e| LedgerError::Database(e.to_string()))?
                    .ok_or(LedgerError::BankAccountNotFound(id))?;
                id.to_string()
            }
            None => String::new(),
        };

        self.set(DEFAULT_SETTLEMENT_ACCOUNT_KEY, &value).await?;
        Ok(())
    }
}
