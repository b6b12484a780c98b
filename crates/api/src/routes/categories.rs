//! Reference category routes, including statement adoption.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use baltfin_db::CategoryRepository;
use baltfin_db::repositories::category::{
    AdoptStatementInput, CategoryError, ExpenseCategoryInput, ExpenseCategoryPatch,
    IncomeCategoryInput, IncomeCategoryPatch,
};
use baltfin_shared::types::{
    Department, Direction, LogisticsStage, OperationType, TransportType, SUBDIVISIONS,
};

use crate::AppState;
use crate::routes::{bad_period, internal_error, parse_period};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/income", get(list_income))
        .route("/categories/income", post(create_income))
        .route("/categories/income/{id}", patch(update_income))
        .route("/categories/income/{id}", delete(delete_income))
        .route("/categories/expense", get(list_expense))
        .route("/categories/expense", post(create_expense))
        .route("/categories/expense/{id}", patch(update_expense))
        .route("/categories/expense/{id}", delete(delete_expense))
        .route("/categories/expense/from-statement", post(adopt_statement))
        .route("/subdivisions", get(list_subdivisions))
}

/// GET /subdivisions - the fixed expense-entry subdivisions.
async fn list_subdivisions() -> impl IntoResponse {
    let body: Vec<_> = SUBDIVISIONS
        .iter()
        .map(|sub| {
            json!({
                "id": sub.id,
                "name": sub.label,
                "department": sub.department,
                "logisticsStage": sub.logistics_stage,
            })
        })
        .collect();
    Json(body)
}

/// GET /categories/income.
async fn list_income(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    match repo.list_income().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for creating an income category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeCategoryRequest {
    /// Display name.
    pub name: String,
    /// Direction the category's revenue belongs to.
    pub direction: Option<Direction>,
    /// Transport type, for segmented revenue categories.
    pub transport_type: Option<TransportType>,
    /// Position on the entry screen.
    #[serde(default)]
    pub sort_order: i32,
}

/// POST /categories/income.
async fn create_income(
    State(state): State<AppState>,
    Json(body): Json<IncomeCategoryRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    let input = IncomeCategoryInput {
        name: body.name,
        direction: body.direction,
        transport_type: body.transport_type,
        sort_order: body.sort_order,
    };
    match repo.create_income(input).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for a partial income category update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeCategoryPatchRequest {
    /// New display name.
    pub name: Option<String>,
    /// New direction.
    pub direction: Option<Direction>,
    /// New transport type.
    pub transport_type: Option<TransportType>,
    /// New position.
    pub sort_order: Option<i32>,
}

/// PATCH /categories/income/{id}.
async fn update_income(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<IncomeCategoryPatchRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    let patch = IncomeCategoryPatch {
        name: body.name,
        direction: body.direction,
        transport_type: body.transport_type,
        sort_order: body.sort_order,
    };
    match repo.update_income(id, patch).await {
        Ok(row) => Json(row).into_response(),
        Err(CategoryError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /categories/income/{id}.
async fn delete_income(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    match repo.delete_income(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(CategoryError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// GET /categories/expense.
async fn list_expense(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    match repo.list_expense().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for creating an expense category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategoryRequest {
    /// Display name.
    pub name: String,
    /// COGS, OPEX, or CAPEX.
    pub operation_type: OperationType,
    /// Pipeline stage, for COGS categories.
    pub logistics_stage: Option<LogisticsStage>,
    /// Owning department.
    pub department: Option<Department>,
    /// Position on the entry screen.
    #[serde(default)]
    pub sort_order: i32,
}

/// POST /categories/expense.
async fn create_expense(
    State(state): State<AppState>,
    Json(body): Json<ExpenseCategoryRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    let input = ExpenseCategoryInput {
        name: body.name,
        operation_type: body.operation_type,
        logistics_stage: body.logistics_stage,
        department: body.department,
        sort_order: body.sort_order,
    };
    match repo.create_expense(input).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for a partial expense category update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategoryPatchRequest {
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

/// PATCH /categories/expense/{id}.
async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ExpenseCategoryPatchRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    let patch = ExpenseCategoryPatch {
        name: body.name,
        operation_type: body.operation_type,
        logistics_stage: body.logistics_stage,
        department: body.department,
        sort_order: body.sort_order,
    };
    match repo.update_expense(id, patch).await {
        Ok(row) => Json(row).into_response(),
        Err(CategoryError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /categories/expense/{id}.
async fn delete_expense(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CategoryRepository::new(state.conn());
    match repo.delete_expense(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(CategoryError::NotFound(_)) => not_found(id),
        Err(e) => internal_error(&e),
    }
}

/// Body for adopting a statement counterparty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptStatementRequest {
    /// Statement month, `YYYY-MM`.
    pub period: String,
    /// Counterparty as aggregated from the statement.
    pub counterparty: String,
    /// Name for the new expense category.
    pub name: String,
    /// COGS, OPEX, or CAPEX.
    pub operation_type: OperationType,
    /// Subdivision id resolving the department and stage.
    pub subdivision: String,
}

/// POST /categories/expense/from-statement - create a category and a
/// rule for a statement counterparty, marking its rows accounted.
async fn adopt_statement(
    State(state): State<AppState>,
    Json(body): Json<AdoptStatementRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&body.period) else {
        return bad_period(&body.period);
    };

    let repo = CategoryRepository::new(state.conn());
    let input = AdoptStatementInput {
        period,
        counterparty: body.counterparty,
        name: body.name,
        operation_type: body.operation_type,
        subdivision: body.subdivision,
    };
    match repo.adopt_statement_expense(input).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(CategoryError::UnknownSubdivision(id)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "unknown_subdivision",
                "message": format!("Unknown subdivision: {id}")
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
            "message": format!("Category not found: {id}")
        })),
    )
        .into_response()
}
