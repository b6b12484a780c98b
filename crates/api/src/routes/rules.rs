//! Classification rule routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use baltfin_db::RuleRepository;
use baltfin_db::repositories::rule::{RuleError, RuleInput};
use baltfin_shared::types::{Department, Direction, LogisticsStage, OperationType};

use crate::AppState;
use crate::routes::internal_error;

/// Creates the rule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rules", get(list_rules))
        .route("/rules", post(create_rule))
        .route("/rules/{id}", put(update_rule))
        .route("/rules/{id}", delete(delete_rule))
}

/// Body for creating or updating a rule.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
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

impl From<RuleRequest> for RuleInput {
    fn from(body: RuleRequest) -> Self {
        Self {
            counterparty: body.counterparty,
            purpose_pattern: body.purpose_pattern,
            operation_type: body.operation_type,
            department: body.department,
            logistics_stage: body.logistics_stage,
            direction: body.direction,
        }
    }
}

/// GET /rules - all rules in matching order.
async fn list_rules(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RuleRepository::new(state.conn());
    match repo.list().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// POST /rules.
async fn create_rule(
    State(state): State<AppState>,
    Json(body): Json<RuleRequest>,
) -> impl IntoResponse {
    let repo = RuleRepository::new(state.conn());
    match repo.create(body.into()).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// PUT /rules/{id}.
async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RuleRequest>,
) -> impl IntoResponse {
    let repo = RuleRepository::new(state.conn());
    match repo.update(id, body.into()).await {
        Ok(row) => Json(row).into_response(),
        Err(RuleError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /rules/{id}.
async fn delete_rule(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = RuleRepository::new(state.conn());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(RuleError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

fn not_found(id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": format!("Classification rule not found: {id}")
        })),
    )
        .into_response()
}
