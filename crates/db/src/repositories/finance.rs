//! Snapshot loader for the reporting services.
//!
//! Loads everything a report window needs in one pass and converts the
//! entity models into the plain records `baltfin_core::pnl` computes
//! over. Monthly tables are filtered by their period key, operations and
//! credit payments by transaction date.

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use baltfin_core::pnl::{
    CreditPaymentRecord, FinanceSnapshot, ManualExpenseRecord, ManualRevenueRecord,
    OperationRecord, SaleRecord,
};
use baltfin_shared::types::Period;

use crate::entities::{
    credit_payments, expense_categories, income_categories, manual_expenses, manual_revenues,
    opening_balances, operations, sales,
};

/// Error types for snapshot loading.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Read-only loader for report snapshots.
#[derive(Debug, Clone)]
pub struct FinanceRepository {
    db: DatabaseConnection,
}

impl FinanceRepository {
    /// Creates a new finance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the snapshot for a report window. Open-ended bounds load
    /// everything on that side. The opening balance is the one recorded
    /// for the month `date_from` falls in.
    pub async fn load_snapshot(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<FinanceSnapshot, FinanceError> {
        let operations = self.load_operations(date_from, date_to).await?;
        let manual_revenues = self.load_manual_revenues(date_from, date_to).await?;
        let manual_expenses = self.load_manual_expenses(date_from, date_to).await?;
        let sales = self.load_sales(date_from, date_to).await?;
        let credit_payments = self.load_credit_payments(date_from, date_to).await?;
        let opening_balance = match date_from {
            Some(from) => self.load_opening_balance(Period::containing(from)).await?,
            None => None,
        };

        Ok(FinanceSnapshot {
            operations,
            manual_revenues,
            manual_expenses,
            sales,
            credit_payments,
            opening_balance,
        })
    }

    async fn load_operations(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<OperationRecord>, FinanceError> {
        let mut query = operations::Entity::find();
        if let Some(from) = date_from {
            query = query.filter(operations::Column::Date.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(operations::Column::Date.lte(to));
        }

        let records = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| OperationRecord {
                date: row.date,
                amount: row.amount,
                operation_type: row.operation_type.into(),
                department: row.department.into(),
                logistics_stage: row.logistics_stage.map(Into::into),
                direction: row.direction.map(Into::into),
            })
            .collect();
        Ok(records)
    }

    async fn load_manual_revenues(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<ManualRevenueRecord>, FinanceError> {
        let mut query = manual_revenues::Entity::find();
        if let Some(from) = date_from {
            query = query.filter(manual_revenues::Column::Period.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(manual_revenues::Column::Period.lte(to));
        }

        let records = query
            .find_also_related(income_categories::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(row, category)| ManualRevenueRecord {
                period: Period::containing(row.period),
                amount: row.amount,
                direction: category.and_then(|c| c.direction).map(Into::into),
            })
            .collect();
        Ok(records)
    }

    async fn load_manual_expenses(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<ManualExpenseRecord>, FinanceError> {
        let mut query = manual_expenses::Entity::find();
        if let Some(from) = date_from {
            query = query.filter(manual_expenses::Column::Period.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(manual_expenses::Column::Period.lte(to));
        }

        let records = query
            .find_also_related(expense_categories::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(row, category)| {
                // an expense without its category has no P&L placement
                let category = category?;
                Some(ManualExpenseRecord {
                    period: Period::containing(row.period),
                    amount: row.amount,
                    operation_type: category.operation_type.into(),
                    logistics_stage: category.logistics_stage.map(Into::into),
                    department: category.department.map(Into::into),
                })
            })
            .collect();
        Ok(records)
    }

    async fn load_sales(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<SaleRecord>, FinanceError> {
        let mut query = sales::Entity::find();
        if let Some(from) = date_from {
            query = query.filter(sales::Column::Period.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(sales::Column::Period.lte(to));
        }

        let records = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| SaleRecord {
                period: Period::containing(row.period),
                direction: row.direction.into(),
                transport_type: row.transport_type.into(),
                weight_kg: row.weight_kg,
                revenue: row.revenue,
            })
            .collect();
        Ok(records)
    }

    async fn load_credit_payments(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<CreditPaymentRecord>, FinanceError> {
        let mut query = credit_payments::Entity::find();
        if let Some(from) = date_from {
            query = query.filter(credit_payments::Column::Date.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(credit_payments::Column::Date.lte(to));
        }

        let records = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| CreditPaymentRecord {
                date: row.date,
                amount: row.amount,
                kind: row.kind.into(),
            })
            .collect();
        Ok(records)
    }

    async fn load_opening_balance(
        &self,
        period: Period,
    ) -> Result<Option<rust_decimal::Decimal>, FinanceError> {
        let row = opening_balances::Entity::find()
            .filter(opening_balances::Column::Period.eq(period.start()))
            .one(&self.db)
            .await?;
        Ok(row.map(|b| b.amount))
    }
}
