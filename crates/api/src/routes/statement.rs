//! Statement expense routes: the statement upload and the review list.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use baltfin_core::statement::{self, ParsedRow};
use baltfin_db::StatementRepository;
use baltfin_db::repositories::statement::StatementError;

use crate::AppState;
use crate::routes::{bad_period, internal_error, parse_period};

/// Creates the statement expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload/statement", post(upload_statement))
        .route("/statement-expenses", get(list_statement_expenses))
        .route("/statement-expenses/{id}", patch(update_statement_expense))
}

/// POST /upload/statement - aggregate a month's outflows by counterparty.
///
/// The month is taken from the first dated row; its previous aggregates
/// are replaced wholesale.
async fn upload_statement(
    State(state): State<AppState>,
    Json(rows): Json<Vec<ParsedRow>>,
) -> impl IntoResponse {
    let Some(period) = statement::batch_period(&rows) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "no_dated_rows",
                "message": "No row carries a parseable date"
            })),
        )
            .into_response();
    };

    let totals = statement::aggregate_expenses(&rows);
    let repo = StatementRepository::new(state.conn());
    match repo.replace_for_period(period, &totals).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({
                "period": period.label(),
                "created": created
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Query parameters for the review list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Month to list, `YYYY-MM`.
    pub period: Option<String>,
    /// Filter by accounted state.
    pub accounted: Option<bool>,
}

/// GET /statement-expenses - aggregates, biggest spend first.
async fn list_statement_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let period = match query.period.as_deref() {
        Some(raw) => match parse_period(raw) {
            Some(period) => Some(period),
            None => return bad_period(raw),
        },
        None => None,
    };

    let repo = StatementRepository::new(state.conn());
    match repo.list(period, query.accounted).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for updating one aggregate's accounted state.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// New accounted state.
    pub accounted: bool,
    /// Expense category to point the aggregate at.
    pub category_id: Option<Uuid>,
}

/// PATCH /statement-expenses/{id}.
async fn update_statement_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRequest>,
) -> impl IntoResponse {
    let repo = StatementRepository::new(state.conn());
    match repo.set_accounted(id, body.accounted, body.category_id).await {
        Ok(row) => Json(row).into_response(),
        Err(StatementError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Statement expense not found: {id}")
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}
