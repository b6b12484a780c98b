//! `SeaORM` Entity for the income_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Direction, TransportType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "income_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub direction: Option<Direction>,
    pub transport_type: Option<TransportType>,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::manual_revenues::Entity")]
    ManualRevenues,
}

impl Related<super::manual_revenues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualRevenues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
