//! `SeaORM` Entity for `financial_entries`, the ledger lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntryStatus, EntryType, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Always positive; the sign is derived from `entry_type`.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub entry_date: DateTimeWithTimeZone,
    pub description: String,
    pub category_id: Uuid,
    pub bank_account_id: Option<Uuid>,
    /// Compatibility tag (`APPT-{id}`, `WITHDRAWAL-{id}`, `SALARY-{id}`),
    /// written in lockstep with the source columns.
    pub reference: Option<String>,
    pub source_appointment_id: Option<Uuid>,
    pub source_withdrawal_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub created_by: Option<Uuid>,
    pub status: EntryStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::financial_categories::Entity",
        from = "Column::CategoryId",
        to = "super::financial_categories::Column::Id"
    )]
    FinancialCategories,
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
    #[sea_orm(
        belongs_to = "super::appointments::Entity",
        from = "Column::SourceAppointmentId",
        to = "super::appointments::Column::Id"
    )]
    Appointments,
    #[sea_orm(
        belongs_to = "super::withdrawal_requests::Entity",
        from = "Column::SourceWithdrawalId",
        to = "super::withdrawal_requests::Column::Id"
    )]
    WithdrawalRequests,
}

impl Related<super::financial_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialCategories.def()
    }
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl Related<super::withdrawal_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WithdrawalRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
