//! `SeaORM` Entity for the expense_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Department, LogisticsStage, OperationType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// COGS, OPEX, or CAPEX.
    pub operation_type: OperationType,
    pub logistics_stage: Option<LogisticsStage>,
    pub department: Option<Department>,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::manual_expenses::Entity")]
    ManualExpenses,
    #[sea_orm(has_many = "super::statement_expenses::Entity")]
    StatementExpenses,
}

impl Related<super::manual_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualExpenses.def()
    }
}

impl Related<super::statement_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatementExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
