//! Operation routes: listing, reclassification, and the bank upload.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use baltfin_core::statement::{self, NewOperation, ParsedRow};
use rust_decimal::Decimal;
use baltfin_db::repositories::operation::{OperationError, OperationFilter};
use baltfin_db::{OperationRepository, RuleRepository};
use baltfin_shared::types::{Department, Direction, LogisticsStage, OperationType};

use crate::AppState;
use crate::routes::internal_error;

/// Creates the operation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operations", get(list_operations))
        .route("/operations", post(create_operation))
        .route("/operations/{id}", patch(reclassify_operation))
        .route("/operations/{id}", delete(delete_operation))
        .route("/upload/bank", post(upload_bank))
}

/// Query parameters for listing operations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
    /// Operation type filter.
    pub operation_type: Option<OperationType>,
    /// Direction filter.
    pub direction: Option<Direction>,
}

/// GET /operations - list classified operations, newest first.
async fn list_operations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = OperationRepository::new(state.conn());
    let filter = OperationFilter {
        date_from: query.date_from,
        date_to: query.date_to,
        operation_type: query.operation_type,
        direction: query.direction,
    };
    match repo.list(&filter).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for recording an operation by hand.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationRequest {
    /// Operation date.
    pub date: NaiveDate,
    /// Signed amount: negative for outflows.
    pub amount: Decimal,
    /// Counterparty name.
    pub counterparty: String,
    /// Payment purpose.
    pub purpose: String,
    /// Operation type.
    pub operation_type: OperationType,
    /// Department.
    pub department: Department,
    /// Logistics stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// Direction.
    pub direction: Option<Direction>,
}

/// POST /operations - record a single operation manually.
async fn create_operation(
    State(state): State<AppState>,
    Json(body): Json<CreateOperationRequest>,
) -> impl IntoResponse {
    let op = NewOperation {
        date: body.date,
        amount: body.amount,
        counterparty: body.counterparty,
        purpose: body.purpose,
        operation_type: body.operation_type,
        department: body.department,
        logistics_stage: body.logistics_stage,
        direction: body.direction,
    };
    let repo = OperationRepository::new(state.conn());
    match repo.create(&op).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for reclassifying an operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclassifyRequest {
    /// New operation type.
    pub operation_type: OperationType,
    /// New department.
    pub department: Department,
    /// New logistics stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// New direction.
    pub direction: Option<Direction>,
}

/// PATCH /operations/{id} - reclassify one operation.
async fn reclassify_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReclassifyRequest>,
) -> impl IntoResponse {
    let repo = OperationRepository::new(state.conn());
    match repo
        .reclassify(
            id,
            body.operation_type,
            body.department,
            body.logistics_stage,
            body.direction,
        )
        .await
    {
        Ok(row) => Json(row).into_response(),
        Err(OperationError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /operations/{id}.
async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OperationRepository::new(state.conn());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(OperationError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// POST /upload/bank - classify uploaded statement rows into operations.
///
/// Both flows are recorded. Rows without a parseable date or amount are
/// skipped and counted in the response.
async fn upload_bank(
    State(state): State<AppState>,
    Json(rows): Json<Vec<ParsedRow>>,
) -> impl IntoResponse {
    let rules = match RuleRepository::new(state.conn()).load_for_matching().await {
        Ok(rules) => rules,
        Err(e) => return internal_error(&e),
    };

    let outcome = statement::build_operations(&rows, &rules);
    let repo = OperationRepository::new(state.conn());
    match repo.insert_batch(&outcome.operations).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({
                "created": created,
                "skipped": outcome.skipped
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}

fn not_found(id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": format!("Operation not found: {id}")
        })),
    )
        .into_response()
}
