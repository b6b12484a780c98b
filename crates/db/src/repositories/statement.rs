//! Statement expense aggregate repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use baltfin_core::statement::CounterpartyTotal;
use baltfin_shared::types::Period;

use crate::entities::statement_expenses;

/// Error types for statement aggregate operations.
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    /// Aggregate row not found.
    #[error("Statement expense not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Statement expense repository.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces a month's aggregates with a fresh upload. Re-uploading a
    /// statement resets the month, including accounted marks.
    pub async fn replace_for_period(
        &self,
        period: Period,
        totals: &[CounterpartyTotal],
    ) -> Result<u64, StatementError> {
        let txn = self.db.begin().await?;

        statement_expenses::Entity::delete_many()
            .filter(statement_expenses::Column::Period.eq(period.start()))
            .exec(&txn)
            .await?;

        let now = Utc::now();
        let models: Vec<statement_expenses::ActiveModel> = totals
            .iter()
            .map(|total| statement_expenses::ActiveModel {
                id: Set(Uuid::new_v4()),
                period: Set(period.start()),
                counterparty: Set(total.counterparty.clone()),
                total_amount: Set(total.total_amount),
                transaction_count: Set(i32::try_from(total.transaction_count).unwrap_or(i32::MAX)),
                accounted: Set(false),
                category_id: Set(None),
                created_at: Set(now.into()),
            })
            .collect();

        let count = models.len() as u64;
        if !models.is_empty() {
            statement_expenses::Entity::insert_many(models)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(count)
    }

    /// Lists aggregates, biggest spend first, optionally narrowed to a
    /// period and accounted state.
    pub async fn list(
        &self,
        period: Option<Period>,
        accounted: Option<bool>,
    ) -> Result<Vec<statement_expenses::Model>, StatementError> {
        let mut query = statement_expenses::Entity::find();
        if let Some(period) = period {
            query = query.filter(statement_expenses::Column::Period.eq(period.start()));
        }
        if let Some(accounted) = accounted {
            query = query.filter(statement_expenses::Column::Accounted.eq(accounted));
        }
        let rows = query
            .order_by_desc(statement_expenses::Column::TotalAmount)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Marks one aggregate accounted, optionally pointing it at a
    /// category.
    pub async fn set_accounted(
        &self,
        id: Uuid,
        accounted: bool,
        category_id: Option<Uuid>,
    ) -> Result<statement_expenses::Model, StatementError> {
        let row = statement_expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StatementError::NotFound(id))?;

        let mut active: statement_expenses::ActiveModel = row.into();
        active.accounted = Set(accounted);
        active.category_id = Set(category_id);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
