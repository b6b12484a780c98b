//! Report inputs and outputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use baltfin_shared::types::{Department, Direction, LogisticsStage, TransportType};

/// Filter shared by every report: an optional date range plus an
/// optional direction.
///
/// The direction filter only applies where the report says it does;
/// monthly-entered figures are stored per month with no transaction
/// direction, so several aggregations ignore it for those.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
    /// Direction to narrow direction-aware sums to.
    pub direction: Option<Direction>,
}

impl ReportFilter {
    /// Filter covering an inclusive date range, both directions.
    #[must_use]
    pub const fn for_range(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from: Some(date_from),
            date_to: Some(date_to),
            direction: None,
        }
    }

    /// Whether a date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| date >= from)
            && self.date_to.is_none_or(|to| date <= to)
    }

    /// Whether a record's direction passes the direction filter.
    /// No filter passes everything; a filter requires an exact match,
    /// so direction-less records are excluded.
    #[must_use]
    pub fn direction_matches(&self, direction: Option<Direction>) -> bool {
        self.direction.is_none() || direction == self.direction
    }
}

/// The headline P&L figures for a filtered window.
///
/// All cost lines are reported as positive magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlData {
    /// Revenue: classified inflows plus monthly-entered revenue.
    pub revenue: Decimal,
    /// Cost of goods sold.
    pub cogs: Decimal,
    /// Revenue minus COGS.
    pub gross_profit: Decimal,
    /// Operating expenses.
    pub opex: Decimal,
    /// Gross profit minus OPEX.
    pub ebitda: Decimal,
    /// EBITDA as a percentage of revenue; zero when revenue is zero.
    pub ebitda_percent: Decimal,
    /// Capital expenditures.
    pub capex: Decimal,
    /// EBITDA minus CAPEX.
    pub net_after_capex: Decimal,
    /// Dividends, transit, and credit payments below the EBITDA line.
    pub below_ebitda: Decimal,
    /// Credit and leasing payments included in `below_ebitda`.
    pub credit_payments: Decimal,
    /// Opening cash balance for the window's starting month, when one
    /// has been recorded.
    pub opening_balance: Option<Decimal>,
}

/// COGS attributed to one logistics stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAmount {
    /// Pipeline stage.
    pub stage: LogisticsStage,
    /// Positive cost magnitude.
    pub amount: Decimal,
}

/// OPEX attributed to one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAmount {
    /// Department.
    pub dept: Department,
    /// Positive cost magnitude.
    pub amount: Decimal,
}

/// Revenue attributed to one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionAmount {
    /// Direction.
    pub direction: Direction,
    /// Revenue magnitude.
    pub amount: Decimal,
}

/// Revenue attributed to one direction and transport type, from the
/// monthly sales entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRevenue {
    /// Direction.
    pub direction: Direction,
    /// Transport type.
    pub transport_type: TransportType,
    /// Revenue magnitude.
    pub revenue: Decimal,
    /// Tonnage carried, in kilograms.
    pub weight_kg: Decimal,
}

/// Per-direction EBITDA with OPEX allocated by revenue share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionEbitda {
    /// Direction.
    pub direction: Direction,
    /// Direction revenue from classified operations.
    pub revenue: Decimal,
    /// Direction COGS from classified operations.
    pub cogs: Decimal,
    /// Share of total OPEX allocated to this direction.
    pub opex_allocated: Decimal,
    /// Revenue minus COGS minus allocated OPEX.
    pub ebitda: Decimal,
}

/// Per-kilogram economics for a filtered window.
///
/// Every per-kg figure is `None` when no tonnage is recorded for the
/// window; a breakdown map is empty in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEconomics {
    /// Total tonnage from monthly sales entries, kilograms.
    pub weight_kg: Decimal,
    /// Revenue per kilogram.
    pub revenue_per_kg: Option<Decimal>,
    /// COGS per kilogram.
    pub cogs_per_kg: Option<Decimal>,
    /// Gross margin per kilogram.
    pub margin_per_kg: Option<Decimal>,
    /// EBITDA per kilogram.
    pub ebitda_per_kg: Option<Decimal>,
    /// Per-kg COGS split by logistics stage.
    pub cogs_by_stage_per_kg: BTreeMap<LogisticsStage, Decimal>,
    /// Per-kg COGS split by department, from classified operations.
    pub cogs_by_department_per_kg: BTreeMap<Department, Decimal>,
}
