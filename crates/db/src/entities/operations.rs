//! `SeaORM` Entity for the operations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Department, Direction, LogisticsStage, OperationType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: Date,
    /// Signed bank amount: negative for outflows.
    pub amount: Decimal,
    pub counterparty: String,
    pub purpose: String,
    pub operation_type: OperationType,
    pub department: Department,
    pub logistics_stage: Option<LogisticsStage>,
    pub direction: Option<Direction>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
