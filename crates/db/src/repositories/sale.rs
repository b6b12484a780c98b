//! Monthly sales repository.
//!
//! Saving a month replaces its sales rows wholesale and rebuilds the
//! revenue operations derived from them, so the P&L sees sales revenue
//! without double counting across re-saves.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use baltfin_shared::types::{Department, Direction, Period, TransportType};

use crate::entities::{operations, sales, sea_orm_active_enums};

/// Purpose prefix of operations derived from sales entries. Used to find
/// and delete them when a month is re-saved.
pub const SALES_PURPOSE_PREFIX: &str = "Продажи ";

/// Placeholder client name for aggregate rows.
const DEFAULT_CLIENT: &str = "—";

/// Error types for sales operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One sales row being saved for a month.
#[derive(Debug, Clone)]
pub struct SaleRowInput {
    /// Direction.
    pub direction: Direction,
    /// Transport type.
    pub transport_type: TransportType,
    /// Client name; the placeholder is used when empty.
    pub client: Option<String>,
    /// Tonnage carried, kilograms.
    pub weight_kg: Decimal,
    /// Cargo volume in cubic meters.
    pub volume: Option<Decimal>,
    /// Chargeable weight, kilograms.
    pub paid_weight_kg: Option<Decimal>,
    /// Revenue for the row.
    pub revenue: Decimal,
}

/// Sales repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sales repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces a month's sales and their derived revenue operations.
    pub async fn replace_for_period(
        &self,
        period: Period,
        rows: &[SaleRowInput],
    ) -> Result<u64, SaleError> {
        let txn = self.db.begin().await?;

        sales::Entity::delete_many()
            .filter(sales::Column::Period.eq(period.start()))
            .exec(&txn)
            .await?;

        operations::Entity::delete_many()
            .filter(operations::Column::Date.gte(period.start()))
            .filter(operations::Column::Date.lte(period.end()))
            .filter(operations::Column::Purpose.starts_with(SALES_PURPOSE_PREFIX))
            .exec(&txn)
            .await?;

        let now = Utc::now();
        for row in rows {
            sales::ActiveModel {
                id: Set(Uuid::new_v4()),
                period: Set(period.start()),
                direction: Set(row.direction.into()),
                transport_type: Set(row.transport_type.into()),
                client: Set(row
                    .client
                    .clone()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CLIENT.to_string())),
                weight_kg: Set(row.weight_kg),
                volume: Set(row.volume.filter(|v| !v.is_zero())),
                paid_weight_kg: Set(row.paid_weight_kg.filter(|w| !w.is_zero())),
                revenue: Set(row.revenue),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;

            if row.revenue > Decimal::ZERO {
                operations::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    date: Set(period.start()),
                    amount: Set(row.revenue),
                    counterparty: Set(DEFAULT_CLIENT.to_string()),
                    purpose: Set(sales_purpose(row.direction, row.transport_type)),
                    operation_type: Set(sea_orm_active_enums::OperationType::Revenue),
                    department: Set(revenue_department(row.direction).into()),
                    logistics_stage: Set(None),
                    direction: Set(Some(row.direction.into())),
                    created_at: Set(now.into()),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(rows.len() as u64)
    }

    /// Lists a month's sales rows.
    pub async fn list(&self, period: Period) -> Result<Vec<sales::Model>, SaleError> {
        let rows = sales::Entity::find()
            .filter(sales::Column::Period.eq(period.start()))
            .order_by_asc(sales::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

/// Purpose text for a derived revenue operation, e.g.
/// "Продажи МСК → КГД (авто)".
#[must_use]
pub fn sales_purpose(direction: Direction, transport_type: TransportType) -> String {
    format!(
        "{SALES_PURPOSE_PREFIX}{} ({})",
        direction.label(),
        transport_type.label()
    )
}

/// Departure-side logistics department credited with the revenue.
#[must_use]
pub const fn revenue_department(direction: Direction) -> Department {
    match direction {
        Direction::MskToKgd => Department::LogisticsMsk,
        Direction::KgdToMsk => Department::LogisticsKgd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_purpose_carries_prefix_and_labels() {
        let purpose = sales_purpose(Direction::MskToKgd, TransportType::Auto);
        assert!(purpose.starts_with(SALES_PURPOSE_PREFIX));
        assert_eq!(purpose, "Продажи МСК → КГД (авто)");
        assert_eq!(
            sales_purpose(Direction::KgdToMsk, TransportType::Ferry),
            "Продажи КГД → МСК (паром)"
        );
    }

    #[test]
    fn test_revenue_department_follows_departure_side() {
        assert_eq!(revenue_department(Direction::MskToKgd), Department::LogisticsMsk);
        assert_eq!(revenue_department(Direction::KgdToMsk), Department::LogisticsKgd);
    }
}
