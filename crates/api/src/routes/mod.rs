//! API route definitions.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, response::Response};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use baltfin_core::pnl::ReportFilter;
use baltfin_shared::types::{Direction, Period};

use crate::AppState;

pub mod alerts;
pub mod balances;
pub mod categories;
pub mod charts;
pub mod credits;
pub mod health;
pub mod manual;
pub mod operations;
pub mod pnl;
pub mod rules;
pub mod sales;
pub mod statement;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(pnl::routes())
        .merge(charts::routes())
        .merge(alerts::routes())
        .merge(operations::routes())
        .merge(statement::routes())
        .merge(rules::routes())
        .merge(categories::routes())
        .merge(manual::routes())
        .merge(sales::routes())
        .merge(credits::routes())
        .merge(balances::routes())
}

/// Date range and direction filter shared by the report endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
    /// Direction to narrow direction-aware sums to.
    pub direction: Option<Direction>,
}

impl From<ReportQuery> for ReportFilter {
    fn from(q: ReportQuery) -> Self {
        Self {
            date_from: q.date_from,
            date_to: q.date_to,
            direction: q.direction,
        }
    }
}

/// Parses a `period` query value: `YYYY-MM` or any date inside the month.
pub(crate) fn parse_period(raw: &str) -> Option<Period> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(Period::containing(date));
    }
    let (year, month) = raw.split_once('-')?;
    Period::from_ym(year.parse().ok()?, month.parse().ok()?)
}

/// 400 response for an unusable `period` parameter.
pub(crate) fn bad_period(raw: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_period",
            "message": format!("Cannot parse period: {raw}")
        })),
    )
        .into_response()
}

/// 500 response hiding the underlying error from the client.
pub(crate) fn internal_error(e: &dyn std::fmt::Display) -> Response {
    tracing::error!(error = %e, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_accepts_month_and_date() {
        assert_eq!(parse_period("2024-03"), Period::from_ym(2024, 3));
        assert_eq!(parse_period("2024-03-17"), Period::from_ym(2024, 3));
        assert_eq!(parse_period("март"), None);
        assert_eq!(parse_period("2024"), None);
    }
}
