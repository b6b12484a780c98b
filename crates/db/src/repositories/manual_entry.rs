//! Monthly manual entry repository.
//!
//! The entry screens save a whole month at once: every cell is keyed by
//! (period, category, direction, transport type), a non-zero amount
//! upserts the cell, a zero amount deletes it. Direction and transport
//! type are stored as empty strings when a cell is not segmented, which
//! keeps the key total.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use baltfin_shared::types::{Department, Direction, LogisticsStage, Period, TransportType};

use crate::entities::{
    expense_categories, income_categories, manual_expenses, manual_revenues, sea_orm_active_enums,
};

/// Error types for manual entry operations.
#[derive(Debug, thiserror::Error)]
pub enum ManualEntryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One revenue cell being saved.
#[derive(Debug, Clone)]
pub struct RevenueCellInput {
    /// Income category.
    pub category_id: Uuid,
    /// Direction segment of the cell key.
    pub direction: Option<Direction>,
    /// Transport segment of the cell key.
    pub transport_type: Option<TransportType>,
    /// Amount; zero clears the cell.
    pub amount: Decimal,
}

/// One expense cell being saved.
#[derive(Debug, Clone)]
pub struct ExpenseCellInput {
    /// Expense category.
    pub category_id: Uuid,
    /// Direction segment of the cell key.
    pub direction: Option<Direction>,
    /// Transport segment of the cell key.
    pub transport_type: Option<TransportType>,
    /// Amount; zero clears the cell.
    pub amount: Decimal,
    /// Optional note shown next to the cell.
    pub comment: Option<String>,
}

/// Storage form of the direction key part: '' when unsegmented.
fn direction_key(direction: Option<Direction>) -> String {
    direction.map_or_else(String::new, |d| d.as_str().to_string())
}

/// Storage form of the transport key part: '' when unsegmented.
fn transport_key(transport_type: Option<TransportType>) -> String {
    transport_type.map_or_else(String::new, |t| t.as_str().to_string())
}

/// Manual entry repository.
#[derive(Debug, Clone)]
pub struct ManualEntryRepository {
    db: DatabaseConnection,
}

impl ManualEntryRepository {
    /// Creates a new manual entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Saves a month of revenue cells in one transaction.
    pub async fn save_revenues(
        &self,
        period: Period,
        cells: &[RevenueCellInput],
    ) -> Result<(), ManualEntryError> {
        let txn = self.db.begin().await?;
        for cell in cells {
            save_revenue_cell(&txn, period, cell).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Saves a month of expense cells in one transaction.
    pub async fn save_expenses(
        &self,
        period: Period,
        cells: &[ExpenseCellInput],
    ) -> Result<(), ManualEntryError> {
        let txn = self.db.begin().await?;
        for cell in cells {
            save_expense_cell(&txn, period, cell).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Lists a month's revenue entries with their categories.
    pub async fn list_revenues(
        &self,
        period: Period,
    ) -> Result<Vec<(manual_revenues::Model, Option<income_categories::Model>)>, ManualEntryError>
    {
        let rows = manual_revenues::Entity::find()
            .filter(manual_revenues::Column::Period.eq(period.start()))
            .find_also_related(income_categories::Entity)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Lists a month's expense entries with their categories.
    ///
    /// With a department given, only that department's cells are
    /// returned, narrowed further by the category's logistics stage:
    /// an explicit stage matches it, no stage matches stage-less
    /// categories. That is how the entry screens query one subdivision
    /// at a time.
    pub async fn list_expenses(
        &self,
        period: Period,
        department: Option<Department>,
        logistics_stage: Option<LogisticsStage>,
    ) -> Result<Vec<(manual_expenses::Model, Option<expense_categories::Model>)>, ManualEntryError>
    {
        let mut query = manual_expenses::Entity::find()
            .find_also_related(expense_categories::Entity)
            .filter(manual_expenses::Column::Period.eq(period.start()));

        if let Some(department) = department {
            query = query.filter(
                expense_categories::Column::Department
                    .eq(sea_orm_active_enums::Department::from(department)),
            );
            query = match logistics_stage {
                Some(stage) => query.filter(
                    expense_categories::Column::LogisticsStage
                        .eq(sea_orm_active_enums::LogisticsStage::from(stage)),
                ),
                None => query.filter(expense_categories::Column::LogisticsStage.is_null()),
            };
        }

        let rows = query.all(&self.db).await?;
        Ok(rows)
    }
}

async fn save_revenue_cell(
    txn: &DatabaseTransaction,
    period: Period,
    cell: &RevenueCellInput,
) -> Result<(), DbErr> {
    let direction = direction_key(cell.direction);
    let transport_type = transport_key(cell.transport_type);

    if cell.amount.is_zero() {
        manual_revenues::Entity::delete_many()
            .filter(manual_revenues::Column::Period.eq(period.start()))
            .filter(manual_revenues::Column::CategoryId.eq(cell.category_id))
            .filter(manual_revenues::Column::Direction.eq(direction))
            .filter(manual_revenues::Column::TransportType.eq(transport_type))
            .exec(txn)
            .await?;
        return Ok(());
    }

    let existing = manual_revenues::Entity::find()
        .filter(manual_revenues::Column::Period.eq(period.start()))
        .filter(manual_revenues::Column::CategoryId.eq(cell.category_id))
        .filter(manual_revenues::Column::Direction.eq(direction.clone()))
        .filter(manual_revenues::Column::TransportType.eq(transport_type.clone()))
        .one(txn)
        .await?;

    let now = Utc::now();
    if let Some(row) = existing {
        let mut active: manual_revenues::ActiveModel = row.into();
        active.amount = Set(cell.amount);
        active.updated_at = Set(now.into());
        active.update(txn).await?;
    } else {
        manual_revenues::ActiveModel {
            id: Set(Uuid::new_v4()),
            period: Set(period.start()),
            category_id: Set(cell.category_id),
            direction: Set(direction),
            transport_type: Set(transport_type),
            amount: Set(cell.amount),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn save_expense_cell(
    txn: &DatabaseTransaction,
    period: Period,
    cell: &ExpenseCellInput,
) -> Result<(), DbErr> {
    let direction = direction_key(cell.direction);
    let transport_type = transport_key(cell.transport_type);

    if cell.amount.is_zero() {
        manual_expenses::Entity::delete_many()
            .filter(manual_expenses::Column::Period.eq(period.start()))
            .filter(manual_expenses::Column::CategoryId.eq(cell.category_id))
            .filter(manual_expenses::Column::Direction.eq(direction))
            .filter(manual_expenses::Column::TransportType.eq(transport_type))
            .exec(txn)
            .await?;
        return Ok(());
    }

    let existing = manual_expenses::Entity::find()
        .filter(manual_expenses::Column::Period.eq(period.start()))
        .filter(manual_expenses::Column::CategoryId.eq(cell.category_id))
        .filter(manual_expenses::Column::Direction.eq(direction.clone()))
        .filter(manual_expenses::Column::TransportType.eq(transport_type.clone()))
        .one(txn)
        .await?;

    let now = Utc::now();
    if let Some(row) = existing {
        let mut active: manual_expenses::ActiveModel = row.into();
        active.amount = Set(cell.amount);
        active.comment = Set(cell.comment.clone());
        active.updated_at = Set(now.into());
        active.update(txn).await?;
    } else {
        manual_expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            period: Set(period.start()),
            category_id: Set(cell.category_id),
            direction: Set(direction),
            transport_type: Set(transport_type),
            amount: Set(cell.amount),
            comment: Set(cell.comment.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parts_use_wire_names() {
        assert_eq!(direction_key(Some(Direction::MskToKgd)), "MSK_TO_KGD");
        assert_eq!(direction_key(Some(Direction::KgdToMsk)), "KGD_TO_MSK");
        assert_eq!(transport_key(Some(TransportType::Ferry)), "FERRY");
    }

    #[test]
    fn test_unsegmented_key_parts_are_empty_strings() {
        // '' rather than NULL keeps the 4-part unique key total
        assert_eq!(direction_key(None), "");
        assert_eq!(transport_key(None), "");
    }
}
