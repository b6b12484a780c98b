//! Opening balance repository: one cash balance per month.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use baltfin_shared::types::Period;

use crate::entities::opening_balances;

/// Error types for opening balance operations.
#[derive(Debug, thiserror::Error)]
pub enum OpeningBalanceError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Opening balance repository.
#[derive(Debug, Clone)]
pub struct OpeningBalanceRepository {
    db: DatabaseConnection,
}

impl OpeningBalanceRepository {
    /// Creates a new opening balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sets the balance for a month, overwriting any previous value.
    pub async fn upsert(
        &self,
        period: Period,
        amount: Decimal,
    ) -> Result<opening_balances::Model, OpeningBalanceError> {
        let now = Utc::now();
        let existing = opening_balances::Entity::find()
            .filter(opening_balances::Column::Period.eq(period.start()))
            .one(&self.db)
            .await?;

        let model = if let Some(row) = existing {
            let mut active: opening_balances::ActiveModel = row.into();
            active.amount = Set(amount);
            active.updated_at = Set(now.into());
            active.update(&self.db).await?
        } else {
            opening_balances::ActiveModel {
                id: Set(Uuid::new_v4()),
                period: Set(period.start()),
                amount: Set(amount),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&self.db)
            .await?
        };
        Ok(model)
    }

    /// Returns the balance recorded for a month, if any.
    pub async fn get(
        &self,
        period: Period,
    ) -> Result<Option<opening_balances::Model>, OpeningBalanceError> {
        let row = opening_balances::Entity::find()
            .filter(opening_balances::Column::Period.eq(period.start()))
            .one(&self.db)
            .await?;
        Ok(row)
    }

    /// Lists all recorded balances, oldest first.
    pub async fn list(&self) -> Result<Vec<opening_balances::Model>, OpeningBalanceError> {
        let rows = opening_balances::Entity::find()
            .order_by_asc(opening_balances::Column::Period)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}
