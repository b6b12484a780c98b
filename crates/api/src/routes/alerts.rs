//! Threshold alert routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};

use baltfin_core::alerts::{self, Thresholds};
use baltfin_core::pnl::PnlService;
use baltfin_db::FinanceRepository;

use crate::AppState;
use crate::routes::{ReportQuery, internal_error};

/// Creates the alert routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/alerts", get(get_alerts))
}

/// GET /alerts - threshold checks over the filtered window.
async fn get_alerts(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    let snapshot = match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => snapshot,
        Err(e) => return internal_error(&e),
    };

    let filter = query.into();
    let pnl = PnlService::compute_pnl(&snapshot, &filter);
    let stages = PnlService::cogs_by_stage(&snapshot, &filter);
    let unit = PnlService::unit_economics(&snapshot, &filter);

    Json(alerts::evaluate(&pnl, &stages, &unit, &Thresholds::default())).into_response()
}
