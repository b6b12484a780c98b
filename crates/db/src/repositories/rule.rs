//! Classification rule repository.
//!
//! Rules are always listed oldest first; the matcher in `baltfin_core`
//! takes the first match, so creation order is the tie-breaker when
//! several rules could apply to one counterparty.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use baltfin_core::classify::ClassificationRule;
use baltfin_shared::types::{Department, Direction, LogisticsStage, OperationType};

use crate::entities::classification_rules;

/// Error types for rule operations.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Rule not found.
    #[error("Classification rule not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or upserting a rule.
#[derive(Debug, Clone)]
pub struct RuleInput {
    /// Counterparty key.
    pub counterparty: String,
    /// Optional purpose pattern.
    pub purpose_pattern: Option<String>,
    /// Target operation type.
    pub operation_type: OperationType,
    /// Target department.
    pub department: Department,
    /// Target logistics stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// Target direction.
    pub direction: Option<Direction>,
}

/// Classification rule repository.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    db: DatabaseConnection,
}

impl RuleRepository {
    /// Creates a new rule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all rules, oldest first.
    pub async fn list(&self) -> Result<Vec<classification_rules::Model>, RuleError> {
        let rows = classification_rules::Entity::find()
            .order_by_asc(classification_rules::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Loads all rules in matching order, converted for the classifier.
    pub async fn load_for_matching(&self) -> Result<Vec<ClassificationRule>, RuleError> {
        let rules = self.list().await?.iter().map(to_core_rule).collect();
        Ok(rules)
    }

    /// Creates a rule.
    pub async fn create(&self, input: RuleInput) -> Result<classification_rules::Model, RuleError> {
        let model = active_model_from_input(&input);
        let created = model.insert(&self.db).await?;
        Ok(created)
    }

    /// Creates a rule for the counterparty or updates the existing one's
    /// classification.
    pub async fn upsert_by_counterparty(
        &self,
        input: RuleInput,
    ) -> Result<classification_rules::Model, RuleError> {
        upsert_on(&self.db, input).await
    }

    /// Updates a rule's classification fields.
    pub async fn update(
        &self,
        id: Uuid,
        input: RuleInput,
    ) -> Result<classification_rules::Model, RuleError> {
        let row = classification_rules::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RuleError::NotFound(id))?;

        let mut active: classification_rules::ActiveModel = row.into();
        active.counterparty = Set(input.counterparty);
        active.purpose_pattern = Set(input.purpose_pattern);
        active.operation_type = Set(input.operation_type.into());
        active.department = Set(input.department.into());
        active.logistics_stage = Set(input.logistics_stage.map(Into::into));
        active.direction = Set(input.direction.map(Into::into));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a rule.
    pub async fn delete(&self, id: Uuid) -> Result<(), RuleError> {
        let result = classification_rules::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RuleError::NotFound(id));
        }
        Ok(())
    }
}

/// Upserts a rule on any connection, so the statement-adoption flow can
/// run it inside its transaction.
pub(crate) async fn upsert_on<C: ConnectionTrait>(
    conn: &C,
    input: RuleInput,
) -> Result<classification_rules::Model, RuleError> {
    let existing = classification_rules::Entity::find()
        .filter(classification_rules::Column::Counterparty.eq(input.counterparty.clone()))
        .one(conn)
        .await?;

    let model = if let Some(row) = existing {
        let mut active: classification_rules::ActiveModel = row.into();
        active.purpose_pattern = Set(input.purpose_pattern);
        active.operation_type = Set(input.operation_type.into());
        active.department = Set(input.department.into());
        active.logistics_stage = Set(input.logistics_stage.map(Into::into));
        active.direction = Set(input.direction.map(Into::into));
        active.update(conn).await?
    } else {
        active_model_from_input(&input).insert(conn).await?
    };
    Ok(model)
}

fn active_model_from_input(input: &RuleInput) -> classification_rules::ActiveModel {
    classification_rules::ActiveModel {
        id: Set(Uuid::new_v4()),
        counterparty: Set(input.counterparty.clone()),
        purpose_pattern: Set(input.purpose_pattern.clone()),
        operation_type: Set(input.operation_type.into()),
        department: Set(input.department.into()),
        logistics_stage: Set(input.logistics_stage.map(Into::into)),
        direction: Set(input.direction.map(Into::into)),
        created_at: Set(Utc::now().into()),
    }
}

fn to_core_rule(model: &classification_rules::Model) -> ClassificationRule {
    ClassificationRule {
        id: model.id,
        counterparty: model.counterparty.clone(),
        purpose_pattern: model.purpose_pattern.clone(),
        operation_type: model.operation_type.clone().into(),
        department: model.department.clone().into(),
        logistics_stage: model.logistics_stage.clone().map(Into::into),
        direction: model.direction.clone().map(Into::into),
    }
}
