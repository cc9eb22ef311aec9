//! `SeaORM` Entity for salaries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "salaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub barber_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    /// Calendar month, 1 through 12.
    pub month: i16,
    pub year: i16,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::barbers::Entity",
        from = "Column::BarberId",
        to = "super::barbers::Column::Id"
    )]
    Barbers,
}

impl Related<super::barbers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Barbers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
