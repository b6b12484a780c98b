//! Opening balance routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use baltfin_db::OpeningBalanceRepository;

use crate::AppState;
use crate::routes::{bad_period, internal_error, parse_period};

/// Creates the opening balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/opening-balances", get(list_balances))
        .route("/opening-balances", put(upsert_balance))
        .route("/opening-balances/current", get(get_balance))
}

/// GET /opening-balances - every recorded month, oldest first.
async fn list_balances(State(state): State<AppState>) -> impl IntoResponse {
    let repo = OpeningBalanceRepository::new(state.conn());
    match repo.list().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Query parameters selecting the month.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Month, `YYYY-MM`.
    pub period: String,
}

/// GET /opening-balances/current?period=YYYY-MM.
async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&query.period) else {
        return bad_period(&query.period);
    };
    let repo = OpeningBalanceRepository::new(state.conn());
    match repo.get(period).await {
        Ok(Some(row)) => Json(row).into_response(),
        Ok(None) => Json(json!({ "period": period.label(), "amount": null })).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Body for setting a month's balance.
#[derive(Debug, Deserialize)]
pub struct UpsertRequest {
    /// Month, `YYYY-MM`.
    pub period: String,
    /// Cash balance at the start of the month.
    pub amount: Decimal,
}

/// PUT /opening-balances - set or overwrite a month's balance.
async fn upsert_balance(
    State(state): State<AppState>,
    Json(body): Json<UpsertRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&body.period) else {
        return bad_period(&body.period);
    };
    let repo = OpeningBalanceRepository::new(state.conn());
    match repo.upsert(period, body.amount).await {
        Ok(row) => Json(row).into_response(),
        Err(e) => internal_error(&e),
    }
}
