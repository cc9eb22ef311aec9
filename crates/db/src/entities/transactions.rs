//! `SeaORM` Entity for transactions, the settlement-side movement log.
//!
//! A transaction row either belongs to an appointment (settlement) or to a
//! bank account (transfer leg), never both. The presence of any row for an
//! appointment is the signal that the appointment is settled.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    EntryStatus, FlowDirection, PaymentMethod, TransactionCategory, TransactionKind,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    /// Always positive; the sign is derived from `direction`.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub direction: FlowDirection,
    pub transaction_type: TransactionKind,
    pub category: TransactionCategory,
    pub status: EntryStatus,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// The amount with its direction applied, negative for outflows.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            FlowDirection::Inflow => self.amount,
            FlowDirection::Outflow => -self.amount,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appointments::Entity",
        from = "Column::AppointmentId",
        to = "super::appointments::Column::Id"
    )]
    Appointments,
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
