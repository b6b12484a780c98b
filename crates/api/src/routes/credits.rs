//! Credit and leasing payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use baltfin_db::CreditPaymentRepository;
use baltfin_db::repositories::credit_payment::{CreditPaymentError, CreditPaymentInput};
use baltfin_shared::types::CreditPaymentKind;

use crate::AppState;
use crate::routes::internal_error;

/// Creates the credit payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credit-payments", get(list_payments))
        .route("/credit-payments", post(create_payment))
        .route("/credit-payments/{id}", delete(delete_payment))
}

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
}

/// GET /credit-payments - payments in a date range, newest first.
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = CreditPaymentRepository::new(state.conn());
    match repo.list(query.date_from, query.date_to).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for recording a payment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Display name of the loan or lease.
    pub name: String,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment amount, positive.
    pub amount: Decimal,
    /// Credit or leasing.
    pub kind: CreditPaymentKind,
}

/// POST /credit-payments.
async fn create_payment(
    State(state): State<AppState>,
    Json(body): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    let repo = CreditPaymentRepository::new(state.conn());
    let input = CreditPaymentInput {
        name: body.name,
        date: body.date,
        amount: body.amount,
        kind: body.kind,
    };
    match repo.create(input).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /credit-payments/{id}.
async fn delete_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CreditPaymentRepository::new(state.conn());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(CreditPaymentError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Credit payment not found: {id}")
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}
