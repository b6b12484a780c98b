//! `SeaORM` Entity for the sales table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Direction, TransportType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// First day of the month the entry belongs to.
    pub period: Date,
    pub direction: Direction,
    pub transport_type: TransportType,
    pub client: String,
    pub weight_kg: Decimal,
    /// Cargo volume in cubic meters, when tracked.
    pub volume: Option<Decimal>,
    /// Chargeable weight, when it differs from the physical one.
    pub paid_weight_kg: Option<Decimal>,
    pub revenue: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
