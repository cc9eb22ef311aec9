//! Category repository for income and expense classification.
//!
//! The settlement paths never assume their categories exist: they resolve
//! the well-known ones here on demand, creating them on first use.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use shearbook_core::ledger::{EntryType, LedgerError, WellKnownCategory};

use crate::entities::{
    financial_categories, financial_entries, sea_orm_active_enums::EntryType as DbEntryType,
};

use super::is_unique_violation;

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category name, unique per type.
    pub name: String,
    /// Whether entries in this category count as income or expense.
    pub category_type: EntryType,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// Finds a well-known category, creating it on first use.
///
/// Generic over the connection so settlement paths can resolve inside
/// their own transaction. A concurrent first use is settled by the
/// unique constraint on (name, type); the loser re-reads the winner's
/// row.
pub(crate) async fn resolve_well_known<C: ConnectionTrait>(
    conn: &C,
    category: WellKnownCategory,
) -> Result<financial_categories::Model, LedgerError> {
    let category_type: DbEntryType = category.entry_type().into();

    if let Some(existing) = find_by_name_and_type(conn, category.name(), &category_type).await? {
        return Ok(existing);
    }

    let now = Utc::now().into();
    let active = financial_categories::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(category.name().to_string()),
        category_type: Set(category_type.clone()),
        description: Set(Some(category.description().to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = financial_categories::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                financial_categories::Column::Name,
                financial_categories::Column::CategoryType,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(conn)
        .await;

    match inserted {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(LedgerError::Database(e.to_string())),
    }

    find_by_name_and_type(conn, category.name(), &category_type)
        .await?
        .ok_or_else(|| {
            LedgerError::Database(format!(
                "Category '{}' missing after insert",
                category.name()
            ))
        })
}

async fn find_by_name_and_type<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    category_type: &DbEntryType,
) -> Result<Option<financial_categories::Model>, LedgerError> {
    financial_categories::Entity::find()
        .filter(financial_categories::Column::Name.eq(name))
        .filter(financial_categories::Column::CategoryType.eq(category_type.clone()))
        .one(conn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))
}

/// Repository for financial categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves a well-known category, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn resolve(
        &self,
        category: WellKnownCategory,
    ) -> Result<financial_categories::Model, LedgerError> {
        resolve_well_known(&self.db, category).await
    }

    /// Lists categories, optionally filtered by type, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        category_type: Option<EntryType>,
    ) -> Result<Vec<financial_categories::Model>, LedgerError> {
        let mut query = financial_categories::Entity::find();
        if let Some(ty) = category_type {
            let ty: DbEntryType = ty.into();
            query = query.filter(financial_categories::Column::CategoryType.eq(ty));
        }
        query
            .order_by_asc(financial_categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A category with this name and type already exists
    /// - Database operation fails
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<financial_categories::Model, LedgerError> {
        let now = Utc::now().into();
        let active = financial_categories::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.clone()),
            category_type: Set(input.category_type.into()),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateCategory { name: input.name }
            } else {
                LedgerError::Database(e.to_string())
            }
        })
    }

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Category is not found
    /// - Category still has entries referencing it
    /// - Database operation fails
    pub async fn delete(&self, id: Uuid) -> Result<(), LedgerError> {
        let category = financial_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::CategoryNotFound(id))?;

        let entry_count = financial_entries::Entity::find()
            .filter(financial_entries::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        if entry_count > 0 {
            return Err(LedgerError::CategoryInUse(id));
        }

        category
            .delete(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(())
    }
}
