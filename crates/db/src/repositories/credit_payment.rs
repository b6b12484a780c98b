//! Credit and leasing payment repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use baltfin_shared::types::CreditPaymentKind;

use crate::entities::credit_payments;

/// Error types for credit payment operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditPaymentError {
    /// Payment not found.
    #[error("Credit payment not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct CreditPaymentInput {
    /// Display name of the loan or lease.
    pub name: String,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment amount, positive.
    pub amount: Decimal,
    /// Credit or leasing.
    pub kind: CreditPaymentKind,
}

/// Credit payment repository.
#[derive(Debug, Clone)]
pub struct CreditPaymentRepository {
    db: DatabaseConnection,
}

impl CreditPaymentRepository {
    /// Creates a new credit payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment.
    pub async fn create(
        &self,
        input: CreditPaymentInput,
    ) -> Result<credit_payments::Model, CreditPaymentError> {
        let model = credit_payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            date: Set(input.date),
            amount: Set(input.amount),
            kind: Set(input.kind.into()),
            created_at: Set(Utc::now().into()),
        };
        let created = model.insert(&self.db).await?;
        Ok(created)
    }

    /// Lists payments within an optional date range, newest first.
    pub async fn list(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<credit_payments::Model>, CreditPaymentError> {
        let mut query = credit_payments::Entity::find();
        if let Some(from) = date_from {
            query = query.filter(credit_payments::Column::Date.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(credit_payments::Column::Date.lte(to));
        }
        let rows = query
            .order_by_desc(credit_payments::Column::Date)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Deletes a payment.
    pub async fn delete(&self, id: Uuid) -> Result<(), CreditPaymentError> {
        let result = credit_payments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CreditPaymentError::NotFound(id));
        }
        Ok(())
    }
}
