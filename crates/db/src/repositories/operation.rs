//! Operation repository for classified bank operations.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use baltfin_core::statement::NewOperation;
use baltfin_shared::types::{Department, Direction, LogisticsStage, OperationType};

use crate::entities::{operations, sea_orm_active_enums};

/// Error types for operation storage.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// Operation not found.
    #[error("Operation not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing operations.
#[derive(Debug, Clone, Default)]
pub struct OperationFilter {
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
    /// Filter by operation type.
    pub operation_type: Option<OperationType>,
    /// Filter by direction.
    pub direction: Option<Direction>,
}

/// Operation repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct OperationRepository {
    db: DatabaseConnection,
}

impl OperationRepository {
    /// Creates a new operation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a batch of classified operations and returns the count.
    pub async fn insert_batch(
        &self,
        new_operations: &[NewOperation],
    ) -> Result<u64, OperationError> {
        if new_operations.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let models: Vec<operations::ActiveModel> = new_operations
            .iter()
            .map(|op| operations::ActiveModel {
                id: Set(Uuid::new_v4()),
                date: Set(op.date),
                amount: Set(op.amount),
                counterparty: Set(op.counterparty.clone()),
                purpose: Set(op.purpose.clone()),
                operation_type: Set(op.operation_type.into()),
                department: Set(op.department.into()),
                logistics_stage: Set(op.logistics_stage.map(Into::into)),
                direction: Set(op.direction.map(Into::into)),
                created_at: Set(now.into()),
            })
            .collect();

        let count = models.len() as u64;
        operations::Entity::insert_many(models).exec(&self.db).await?;
        Ok(count)
    }

    /// Inserts a single, already classified operation.
    pub async fn create(&self, op: &NewOperation) -> Result<operations::Model, OperationError> {
        let model = operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(op.date),
            amount: Set(op.amount),
            counterparty: Set(op.counterparty.clone()),
            purpose: Set(op.purpose.clone()),
            operation_type: Set(op.operation_type.into()),
            department: Set(op.department.into()),
            logistics_stage: Set(op.logistics_stage.map(Into::into)),
            direction: Set(op.direction.map(Into::into)),
            created_at: Set(Utc::now().into()),
        };
        let created = model.insert(&self.db).await?;
        Ok(created)
    }

    /// Lists operations matching the filter, newest first.
    pub async fn list(&self, filter: &OperationFilter) -> Result<Vec<operations::Model>, OperationError> {
        let mut query = operations::Entity::find();

        if let Some(from) = filter.date_from {
            query = query.filter(operations::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(operations::Column::Date.lte(to));
        }
        if let Some(operation_type) = filter.operation_type {
            query = query.filter(
                operations::Column::OperationType
                    .eq(sea_orm_active_enums::OperationType::from(operation_type)),
            );
        }
        if let Some(direction) = filter.direction {
            query = query.filter(
                operations::Column::Direction
                    .eq(sea_orm_active_enums::Direction::from(direction)),
            );
        }

        let rows = query
            .order_by_desc(operations::Column::Date)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Reclassifies a single operation.
    pub async fn reclassify(
        &self,
        id: Uuid,
        operation_type: OperationType,
        department: Department,
        logistics_stage: Option<LogisticsStage>,
        direction: Option<Direction>,
    ) -> Result<operations::Model, OperationError> {
        let row = operations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OperationError::NotFound(id))?;

        let mut active: operations::ActiveModel = row.into();
        active.operation_type = Set(operation_type.into());
        active.department = Set(department.into());
        active.logistics_stage = Set(logistics_stage.map(Into::into));
        active.direction = Set(direction.map(Into::into));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an operation.
    pub async fn delete(&self, id: Uuid) -> Result<(), OperationError> {
        let result = operations::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(OperationError::NotFound(id));
        }
        Ok(())
    }
}
