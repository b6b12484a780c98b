//! Reference category repository: income and expense categories, plus
//! the statement-adoption flow that creates a category, a matching
//! classification rule, and marks the statement rows accounted in one
//! transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use baltfin_shared::types::{
    find_subdivision, Department, Direction, LogisticsStage, OperationType, Period, TransportType,
};

use crate::entities::{expense_categories, income_categories, statement_expenses};
use crate::repositories::rule::{self, RuleInput};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Unknown subdivision identifier.
    #[error("Unknown subdivision: {0}")]
    UnknownSubdivision(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<rule::RuleError> for CategoryError {
    fn from(e: rule::RuleError) -> Self {
        match e {
            rule::RuleError::NotFound(id) => Self::NotFound(id),
            rule::RuleError::Database(db) => Self::Database(db),
        }
    }
}

/// Input for creating an income category.
#[derive(Debug, Clone)]
pub struct IncomeCategoryInput {
    /// Display name.
    pub name: String,
    /// Direction the category's revenue belongs to.
    pub direction: Option<Direction>,
    /// Transport type, for segmented revenue categories.
    pub transport_type: Option<TransportType>,
    /// Position on the entry screen.
    pub sort_order: i32,
}

/// Input for creating an expense category.
#[derive(Debug, Clone)]
pub struct ExpenseCategoryInput {
    /// Display name.
    pub name: String,
    /// COGS, OPEX, or CAPEX.
    pub operation_type: OperationType,
    /// Pipeline stage, for COGS categories.
    pub logistics_stage: Option<LogisticsStage>,
    /// Owning department.
    pub department: Option<Department>,
    /// Position on the entry screen.
    pub sort_order: i32,
}

/// Partial update for an income category; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct IncomeCategoryPatch {
    /// New display name.
    pub name: Option<String>,
    /// New direction.
    pub direction: Option<Direction>,
    /// New transport type.
    pub transport_type: Option<TransportType>,
    /// New position.
    pub sort_order: Option<i32>,
}

/// Partial update for an expense category; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ExpenseCategoryPatch {
    /// New display name.
    pub name: Option<String>,
    /// New operation type.
    pub operation_type: Option<OperationType>,
    /// New pipeline stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// New department.
    pub department: Option<Department>,
    /// New position.
    pub sort_order: Option<i32>,
}

/// Input for adopting a statement counterparty into the references.
#[derive(Debug, Clone)]
pub struct AdoptStatementInput {
    /// Statement period the rows belong to.
    pub period: Period,
    /// Counterparty as aggregated from the statement.
    pub counterparty: String,
    /// Name for the new expense category.
    pub name: String,
    /// COGS, OPEX, or CAPEX.
    pub operation_type: OperationType,
    /// Subdivision id resolving the department and stage.
    pub subdivision: String,
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // =========================================================================
    // Income categories
    // =========================================================================

    /// Lists income categories in entry-screen order.
    pub async fn list_income(&self) -> Result<Vec<income_categories::Model>, CategoryError> {
        let rows = income_categories::Entity::find()
            .order_by_asc(income_categories::Column::SortOrder)
            .order_by_asc(income_categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Creates an income category.
    pub async fn create_income(
        &self,
        input: IncomeCategoryInput,
    ) -> Result<income_categories::Model, CategoryError> {
        let model = income_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            direction: Set(input.direction.map(Into::into)),
            transport_type: Set(input.transport_type.map(Into::into)),
            sort_order: Set(input.sort_order),
            created_at: Set(Utc::now().into()),
        };
        let created = model.insert(&self.db).await?;
        Ok(created)
    }

    /// Applies a partial update to an income category.
    pub async fn update_income(
        &self,
        id: Uuid,
        patch: IncomeCategoryPatch,
    ) -> Result<income_categories::Model, CategoryError> {
        let row = income_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let mut active: income_categories::ActiveModel = row.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(direction) = patch.direction {
            active.direction = Set(Some(direction.into()));
        }
        if let Some(transport_type) = patch.transport_type {
            active.transport_type = Set(Some(transport_type.into()));
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an income category; its manual entries cascade.
    pub async fn delete_income(&self, id: Uuid) -> Result<(), CategoryError> {
        let result = income_categories::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // Expense categories
    // =========================================================================

    /// Lists expense categories in entry-screen order.
    pub async fn list_expense(&self) -> Result<Vec<expense_categories::Model>, CategoryError> {
        let rows = expense_categories::Entity::find()
            .order_by_asc(expense_categories::Column::SortOrder)
            .order_by_asc(expense_categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Creates an expense category.
    pub async fn create_expense(
        &self,
        input: ExpenseCategoryInput,
    ) -> Result<expense_categories::Model, CategoryError> {
        let model = expense_category_model(&input);
        let created = model.insert(&self.db).await?;
        Ok(created)
    }

    /// Applies a partial update to an expense category.
    pub async fn update_expense(
        &self,
        id: Uuid,
        patch: ExpenseCategoryPatch,
    ) -> Result<expense_categories::Model, CategoryError> {
        let row = expense_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let mut active: expense_categories::ActiveModel = row.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(operation_type) = patch.operation_type {
            active.operation_type = Set(operation_type.into());
        }
        if let Some(logistics_stage) = patch.logistics_stage {
            active.logistics_stage = Set(Some(logistics_stage.into()));
        }
        if let Some(department) = patch.department {
            active.department = Set(Some(department.into()));
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an expense category; its manual entries cascade and any
    /// statement rows pointing at it are detached.
    pub async fn delete_expense(&self, id: Uuid) -> Result<(), CategoryError> {
        let result = expense_categories::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // Statement adoption
    // =========================================================================

    /// Turns an unaccounted statement counterparty into a reference:
    /// creates the expense category, upserts the classification rule for
    /// the counterparty, and marks the period's statement rows accounted.
    pub async fn adopt_statement_expense(
        &self,
        input: AdoptStatementInput,
    ) -> Result<expense_categories::Model, CategoryError> {
        let subdivision = find_subdivision(&input.subdivision)
            .ok_or_else(|| CategoryError::UnknownSubdivision(input.subdivision.clone()))?;

        let txn = self.db.begin().await?;

        let category = expense_category_model(&ExpenseCategoryInput {
            name: input.name.clone(),
            operation_type: input.operation_type,
            logistics_stage: subdivision.logistics_stage,
            department: Some(subdivision.department),
            sort_order: 0,
        })
        .insert(&txn)
        .await?;

        rule::upsert_on(
            &txn,
            RuleInput {
                counterparty: input.counterparty.clone(),
                purpose_pattern: None,
                operation_type: input.operation_type,
                department: subdivision.department,
                logistics_stage: subdivision.logistics_stage,
                direction: None,
            },
        )
        .await?;

        statement_expenses::Entity::update_many()
            .col_expr(
                statement_expenses::Column::Accounted,
                sea_orm::sea_query::Expr::value(true),
            )
            .col_expr(
                statement_expenses::Column::CategoryId,
                sea_orm::sea_query::Expr::value(category.id),
            )
            .filter(statement_expenses::Column::Period.eq(input.period.start()))
            .filter(statement_expenses::Column::Counterparty.eq(input.counterparty))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(category)
    }
}

fn expense_category_model(input: &ExpenseCategoryInput) -> expense_categories::ActiveModel {
    expense_categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.clone()),
        operation_type: Set(input.operation_type.into()),
        logistics_stage: Set(input.logistics_stage.map(Into::into)),
        department: Set(input.department.map(Into::into)),
        sort_order: Set(input.sort_order),
        created_at: Set(Utc::now().into()),
    }
}
