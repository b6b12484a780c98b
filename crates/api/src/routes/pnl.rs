//! P&L and unit economics report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};

use baltfin_core::pnl::PnlService;
use baltfin_db::FinanceRepository;

use crate::AppState;
use crate::routes::{ReportQuery, internal_error};

/// Creates the P&L routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pnl", get(get_pnl))
        .route("/pnl/unit-economics", get(get_unit_economics))
}

/// GET /pnl - headline P&L for the filtered window.
async fn get_pnl(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => Json(PnlService::compute_pnl(&snapshot, &query.into())).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET /pnl/unit-economics - per-kilogram figures for the window.
async fn get_unit_economics(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => {
            Json(PnlService::unit_economics(&snapshot, &query.into())).into_response()
        }
        Err(e) => internal_error(&e),
    }
}
