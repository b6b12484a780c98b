//! Chart data routes: P&L breakdowns and monthly series.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use baltfin_core::pnl::PnlService;
use baltfin_core::timeseries::{self, SeriesMetric};
use baltfin_db::FinanceRepository;
use baltfin_shared::types::Direction;

use crate::AppState;
use crate::routes::{ReportQuery, internal_error};

/// Creates the chart routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/charts/cogs-by-stage", get(get_cogs_by_stage))
        .route("/charts/opex-by-department", get(get_opex_by_department))
        .route("/charts/revenue-by-direction", get(get_revenue_by_direction))
        .route("/charts/revenue-by-segment", get(get_revenue_by_segment))
        .route("/charts/ebitda-by-direction", get(get_ebitda_by_direction))
        .route("/charts/monthly", get(get_monthly_series))
        .route("/charts/margin-per-kg", get(get_margin_series))
}

/// GET /charts/cogs-by-stage - COGS split along the pipeline.
async fn get_cogs_by_stage(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => Json(PnlService::cogs_by_stage(&snapshot, &query.into())).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET /charts/opex-by-department - OPEX split by department.
async fn get_opex_by_department(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => {
            Json(PnlService::opex_by_department(&snapshot, &query.into())).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// GET /charts/revenue-by-direction - revenue split by direction.
async fn get_revenue_by_direction(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => {
            Json(PnlService::revenue_by_direction(&snapshot, &query.into())).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// GET /charts/revenue-by-segment - revenue and tonnage by direction and
/// transport type.
async fn get_revenue_by_segment(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => {
            Json(PnlService::revenue_by_segment(&snapshot, &query.into())).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// GET /charts/ebitda-by-direction - per-direction EBITDA with
/// revenue-share OPEX allocation.
async fn get_ebitda_by_direction(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(query.date_from, query.date_to).await {
        Ok(snapshot) => {
            Json(PnlService::ebitda_by_direction(&snapshot, &query.into())).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// Query parameters for the monthly metric series.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeriesQuery {
    /// P&L line to plot.
    pub metric: SeriesMetric,
    /// Inclusive start date; defaults to eleven months before the end.
    pub date_from: Option<chrono::NaiveDate>,
    /// Inclusive end date; defaults to today.
    pub date_to: Option<chrono::NaiveDate>,
    /// Direction filter.
    pub direction: Option<Direction>,
}

/// GET /charts/monthly - one P&L metric per calendar month.
async fn get_monthly_series(
    State(state): State<AppState>,
    Query(query): Query<MonthlySeriesQuery>,
) -> impl IntoResponse {
    let windows = timeseries::month_windows(
        query.date_from,
        query.date_to,
        Utc::now().date_naive(),
    );
    let (load_from, load_to) = series_bounds(&windows);

    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(load_from, load_to).await {
        Ok(snapshot) => Json(timeseries::metric_series(
            &snapshot,
            query.metric,
            &windows,
            query.direction,
        ))
        .into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET /charts/margin-per-kg - monthly gross margin per kilogram.
async fn get_margin_series(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let windows =
        timeseries::month_windows(query.date_from, query.date_to, Utc::now().date_naive());
    let (load_from, load_to) = series_bounds(&windows);

    let repo = FinanceRepository::new(state.conn());
    match repo.load_snapshot(load_from, load_to).await {
        Ok(snapshot) => {
            Json(timeseries::margin_series(&snapshot, &windows, query.direction)).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

fn series_bounds(
    windows: &[timeseries::MonthWindow],
) -> (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>) {
    match (windows.first(), windows.last()) {
        (Some(first), Some(last)) => (Some(first.date_from), Some(last.date_to)),
        _ => (None, None),
    }
}
