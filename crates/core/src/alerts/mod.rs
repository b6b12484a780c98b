//! Threshold-based alerts over the computed reports.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::pnl::{PnlData, StageAmount, UnitEconomics};
use baltfin_shared::types::LogisticsStage;

/// Alert thresholds. Fixed for now; the defaults mirror what the
/// business watches month to month.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Minimum acceptable gross margin per kilogram, rubles.
    pub margin_per_kg_min: Decimal,
    /// Maximum share of COGS the mainline stage may take, percent.
    pub mainline_cogs_percent_max: Decimal,
    /// Maximum OPEX as a share of revenue, percent.
    pub overhead_percent_max: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            margin_per_kg_min: Decimal::from(5),
            mainline_cogs_percent_max: Decimal::from(60),
            overhead_percent_max: Decimal::from(15),
        }
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A threshold is crossed but nothing is broken.
    Warning,
    /// Reserved for data problems.
    Error,
}

/// A single raised alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Stable alert kind, for client-side routing.
    #[serde(rename = "type")]
    pub kind: String,
    /// Severity.
    pub severity: Severity,
    /// Human-readable Russian message.
    pub message: String,
}

impl Alert {
    fn warning(kind: &str, message: String) -> Self {
        Self {
            kind: kind.to_string(),
            severity: Severity::Warning,
            message,
        }
    }
}

/// Evaluates all thresholds against a window's computed reports.
///
/// A margin alert only fires for a positive margin below the floor;
/// zero or negative margin months are visible enough in the P&L itself.
/// The mainline and overhead checks skip windows with no COGS or no
/// revenue respectively.
#[must_use]
pub fn evaluate(
    pnl: &PnlData,
    cogs_by_stage: &[StageAmount],
    unit: &UnitEconomics,
    thresholds: &Thresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(margin) = unit.margin_per_kg {
        if margin > Decimal::ZERO && margin < thresholds.margin_per_kg_min {
            alerts.push(Alert::warning(
                "margin_per_kg",
                format!(
                    "Маржа на кг упала до {} ₽ (порог {} ₽)",
                    margin.round_dp(1),
                    thresholds.margin_per_kg_min,
                ),
            ));
        }
    }

    let total_cogs: Decimal = cogs_by_stage.iter().map(|s| s.amount).sum();
    if total_cogs > Decimal::ZERO {
        let mainline: Decimal = cogs_by_stage
            .iter()
            .filter(|s| s.stage == LogisticsStage::Mainline)
            .map(|s| s.amount)
            .sum();
        let percent = mainline / total_cogs * Decimal::ONE_HUNDRED;
        if percent > thresholds.mainline_cogs_percent_max {
            alerts.push(Alert::warning(
                "mainline_cogs",
                format!(
                    "Магистраль занимает {}% себестоимости (порог {}%)",
                    percent.round_dp(0),
                    thresholds.mainline_cogs_percent_max,
                ),
            ));
        }
    }

    if pnl.revenue > Decimal::ZERO {
        let percent = pnl.opex / pnl.revenue * Decimal::ONE_HUNDRED;
        if percent > thresholds.overhead_percent_max {
            alerts.push(Alert::warning(
                "overhead",
                format!(
                    "Накладные расходы составляют {}% выручки (порог {}%)",
                    percent.round_dp(0),
                    thresholds.overhead_percent_max,
                ),
            ));
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn pnl(revenue: Decimal, opex: Decimal) -> PnlData {
        PnlData {
            revenue,
            cogs: dec!(0),
            gross_profit: revenue,
            opex,
            ebitda: revenue - opex,
            ebitda_percent: dec!(0),
            capex: dec!(0),
            net_after_capex: revenue - opex,
            below_ebitda: dec!(0),
            credit_payments: dec!(0),
            opening_balance: None,
        }
    }

    fn unit(margin_per_kg: Option<Decimal>) -> UnitEconomics {
        UnitEconomics {
            weight_kg: dec!(1000),
            revenue_per_kg: None,
            cogs_per_kg: None,
            margin_per_kg,
            ebitda_per_kg: None,
            cogs_by_stage_per_kg: BTreeMap::new(),
            cogs_by_department_per_kg: BTreeMap::new(),
        }
    }

    fn stage(stage: LogisticsStage, amount: Decimal) -> StageAmount {
        StageAmount { stage, amount }
    }

    #[test]
    fn test_margin_alert_fires_between_zero_and_floor() {
        let alerts = evaluate(
            &pnl(dec!(0), dec!(0)),
            &[],
            &unit(Some(dec!(3.26))),
            &Thresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "margin_per_kg");
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert!(alerts[0].message.contains("3.3"));
    }

    #[test]
    fn test_margin_alert_skips_zero_negative_and_unknown() {
        let thresholds = Thresholds::default();
        for margin in [None, Some(dec!(0)), Some(dec!(-4)), Some(dec!(9))] {
            let alerts = evaluate(&pnl(dec!(0), dec!(0)), &[], &unit(margin), &thresholds);
            assert!(alerts.is_empty());
        }
    }

    #[test]
    fn test_mainline_alert_fires_above_sixty_percent() {
        let stages = [
            stage(LogisticsStage::Mainline, dec!(70)),
            stage(LogisticsStage::LastMile, dec!(30)),
        ];
        let alerts = evaluate(&pnl(dec!(0), dec!(0)), &stages, &unit(None), &Thresholds::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "mainline_cogs");
        assert!(alerts[0].message.contains("70%"));
    }

    #[test]
    fn test_mainline_alert_quiet_at_threshold_or_without_cogs() {
        let thresholds = Thresholds::default();
        let at_threshold = [
            stage(LogisticsStage::Mainline, dec!(60)),
            stage(LogisticsStage::LastMile, dec!(40)),
        ];
        assert!(evaluate(&pnl(dec!(0), dec!(0)), &at_threshold, &unit(None), &thresholds)
            .is_empty());
        assert!(evaluate(&pnl(dec!(0), dec!(0)), &[], &unit(None), &thresholds).is_empty());
    }

    #[test]
    fn test_overhead_alert_fires_above_fifteen_percent() {
        let alerts = evaluate(
            &pnl(dec!(100000), dec!(20000)),
            &[],
            &unit(None),
            &Thresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "overhead");
        assert!(alerts[0].message.contains("20%"));
    }

    #[test]
    fn test_overhead_alert_quiet_without_revenue() {
        let alerts = evaluate(
            &pnl(dec!(0), dec!(20000)),
            &[],
            &unit(None),
            &Thresholds::default(),
        );
        assert!(alerts.is_empty());
    }
}
