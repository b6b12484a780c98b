//! Monthly sales entry routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use baltfin_db::SaleRepository;
use baltfin_db::repositories::sale::SaleRowInput;
use baltfin_shared::types::{Direction, TransportType};

use crate::AppState;
use crate::routes::{bad_period, internal_error, parse_period};

/// Creates the sales routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales/manual", get(list_sales))
        .route("/sales/manual", post(save_sales))
}

/// Query parameters selecting the month.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Month, `YYYY-MM`.
    pub period: String,
}

/// GET /sales/manual?period=YYYY-MM.
async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&query.period) else {
        return bad_period(&query.period);
    };
    let repo = SaleRepository::new(state.conn());
    match repo.list(period).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// One sales row in a save request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRowRequest {
    /// Direction.
    pub direction: Direction,
    /// Transport type.
    pub transport_type: TransportType,
    /// Client name.
    pub client: Option<String>,
    /// Tonnage carried, kilograms.
    pub weight_kg: Decimal,
    /// Cargo volume in cubic meters.
    pub volume: Option<Decimal>,
    /// Chargeable weight, kilograms.
    pub paid_weight_kg: Option<Decimal>,
    /// Revenue for the row.
    pub revenue: Decimal,
}

/// Body for saving a month of sales.
#[derive(Debug, Deserialize)]
pub struct SaveSalesRequest {
    /// Month, `YYYY-MM`.
    pub period: String,
    /// Rows to save; replaces the month wholesale.
    pub rows: Vec<SaleRowRequest>,
}

/// POST /sales/manual - replace a month's sales and rebuild the derived
/// revenue operations.
async fn save_sales(
    State(state): State<AppState>,
    Json(body): Json<SaveSalesRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&body.period) else {
        return bad_period(&body.period);
    };
    let rows: Vec<SaleRowInput> = body
        .rows
        .into_iter()
        .map(|row| SaleRowInput {
            direction: row.direction,
            transport_type: row.transport_type,
            client: row.client,
            weight_kg: row.weight_kg,
            volume: row.volume,
            paid_weight_kg: row.paid_weight_kg,
            revenue: row.revenue,
        })
        .collect();

    let repo = SaleRepository::new(state.conn());
    match repo.replace_for_period(period, &rows).await {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(json!({
                "period": period.label(),
                "saved": saved
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}
