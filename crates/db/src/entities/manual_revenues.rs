//! `SeaORM` Entity for the manual_revenues table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "manual_revenues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// First day of the month the figure belongs to.
    pub period: Date,
    pub category_id: Uuid,
    /// Part of the upsert key; empty when not segmented.
    pub direction: String,
    /// Part of the upsert key; empty when not segmented.
    pub transport_type: String,
    pub amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::income_categories::Entity",
        from = "Column::CategoryId",
        to = "super::income_categories::Column::Id"
    )]
    IncomeCategories,
}

impl Related<super::income_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomeCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
