//! Calendar-month windows and monthly metric series for charts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pnl::{FinanceSnapshot, PnlService, ReportFilter};
use baltfin_shared::types::{Direction, Period};

/// How many months back the default chart window reaches; counting the
/// current month it spans a year.
const DEFAULT_MONTHS_BACK: u32 = 11;

/// One calendar month of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// The month.
    pub period: Period,
    /// First day of the month.
    pub date_from: NaiveDate,
    /// Last day of the month.
    pub date_to: NaiveDate,
}

impl From<Period> for MonthWindow {
    fn from(period: Period) -> Self {
        Self {
            period,
            date_from: period.start(),
            date_to: period.end(),
        }
    }
}

/// Builds the month windows a chart covers.
///
/// The range defaults to the last twelve months ending at `today`; an
/// explicit bound overrides its end. Both bounds are snapped to whole
/// months, and the final month is included even when `date_to` falls
/// mid-month.
#[must_use]
pub fn month_windows(
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<MonthWindow> {
    let to = date_to.unwrap_or(today);
    let start = date_from.map_or_else(
        || Period::containing(to).months_back(DEFAULT_MONTHS_BACK),
        Period::containing,
    );

    let mut windows = Vec::new();
    let mut period = start;
    while period.start() <= to {
        windows.push(MonthWindow::from(period));
        period = period.next();
    }
    windows
}

/// Which P&L line a monthly series plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesMetric {
    /// Monthly revenue.
    Revenue,
    /// Monthly COGS.
    Cogs,
    /// Monthly EBITDA.
    Ebitda,
    /// Monthly EBITDA minus CAPEX.
    NetAfterCapex,
}

/// One month of a metric series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Month label, `YYYY-MM`.
    pub label: String,
    /// Metric value for the month.
    pub value: Decimal,
}

/// One month of the margin-per-kg series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginPoint {
    /// Month label, `YYYY-MM`.
    pub label: String,
    /// Gross margin per kilogram; zero for months with no tonnage.
    pub margin_per_kg: Decimal,
}

fn window_filter(window: MonthWindow, direction: Option<Direction>) -> ReportFilter {
    ReportFilter {
        date_from: Some(window.date_from),
        date_to: Some(window.date_to),
        direction,
    }
}

/// Computes a monthly P&L metric series over the given windows.
#[must_use]
pub fn metric_series(
    snapshot: &FinanceSnapshot,
    metric: SeriesMetric,
    windows: &[MonthWindow],
    direction: Option<Direction>,
) -> Vec<SeriesPoint> {
    windows
        .iter()
        .map(|window| {
            let pnl = PnlService::compute_pnl(snapshot, &window_filter(*window, direction));
            let value = match metric {
                SeriesMetric::Revenue => pnl.revenue,
                SeriesMetric::Cogs => pnl.cogs,
                SeriesMetric::Ebitda => pnl.ebitda,
                SeriesMetric::NetAfterCapex => pnl.net_after_capex,
            };
            SeriesPoint {
                label: window.period.label(),
                value,
            }
        })
        .collect()
}

/// Computes the monthly margin-per-kg series over the given windows.
/// Months without recorded tonnage plot as zero rather than a gap.
#[must_use]
pub fn margin_series(
    snapshot: &FinanceSnapshot,
    windows: &[MonthWindow],
    direction: Option<Direction>,
) -> Vec<MarginPoint> {
    windows
        .iter()
        .map(|window| {
            let unit = PnlService::unit_economics(snapshot, &window_filter(*window, direction));
            MarginPoint {
                label: window.period.label(),
                margin_per_kg: unit.margin_per_kg.unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnl::{OperationRecord, SaleRecord};
    use baltfin_shared::types::{Department, OperationType, TransportType};
    use rust_decimal_macros::dec;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_default_window_spans_a_year() {
        let windows = month_windows(None, None, day(2024, 3, 15));
        assert_eq!(windows.len(), 12);
        assert_eq!(windows[0].period.label(), "2023-04");
        assert_eq!(windows[11].period.label(), "2024-03");
        assert_eq!(windows[11].date_to, day(2024, 3, 31));
    }

    #[test]
    fn test_explicit_range_is_snapped_to_months() {
        let windows = month_windows(Some(day(2024, 1, 20)), Some(day(2024, 3, 5)), day(2025, 1, 1));
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].date_from, day(2024, 1, 1));
        assert_eq!(windows[2].date_to, day(2024, 3, 31));
    }

    #[test]
    fn test_metric_series_buckets_by_month() {
        let snapshot = FinanceSnapshot {
            operations: vec![
                OperationRecord {
                    date: day(2024, 1, 10),
                    amount: dec!(100),
                    operation_type: OperationType::Revenue,
                    department: Department::General,
                    logistics_stage: None,
                    direction: None,
                },
                OperationRecord {
                    date: day(2024, 2, 10),
                    amount: dec!(250),
                    operation_type: OperationType::Revenue,
                    department: Department::General,
                    logistics_stage: None,
                    direction: None,
                },
            ],
            ..FinanceSnapshot::default()
        };
        let windows = month_windows(Some(day(2024, 1, 1)), Some(day(2024, 2, 29)), day(2024, 3, 1));

        let series = metric_series(&snapshot, SeriesMetric::Revenue, &windows, None);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "2024-01");
        assert_eq!(series[0].value, dec!(100));
        assert_eq!(series[1].label, "2024-02");
        assert_eq!(series[1].value, dec!(250));
    }

    #[test]
    fn test_margin_series_defaults_to_zero_without_tonnage() {
        let snapshot = FinanceSnapshot {
            sales: vec![SaleRecord {
                period: Period::from_ym(2024, 2).unwrap(),
                direction: Direction::MskToKgd,
                transport_type: TransportType::Auto,
                weight_kg: dec!(100),
                revenue: dec!(0),
            }],
            operations: vec![OperationRecord {
                date: day(2024, 2, 5),
                amount: dec!(700),
                operation_type: OperationType::Revenue,
                department: Department::General,
                logistics_stage: None,
                direction: None,
            }],
            ..FinanceSnapshot::default()
        };
        let windows = month_windows(Some(day(2024, 1, 1)), Some(day(2024, 2, 29)), day(2024, 3, 1));

        let series = margin_series(&snapshot, &windows, None);
        assert_eq!(series[0].margin_per_kg, dec!(0));
        assert_eq!(series[1].margin_per_kg, dec!(7));
    }
}
