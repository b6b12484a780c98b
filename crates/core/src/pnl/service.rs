//! Report calculations over a loaded [`FinanceSnapshot`].

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::pnl::snapshot::{FinanceSnapshot, FinancialEntry};
use crate::pnl::types::{
    DepartmentAmount, DirectionAmount, DirectionEbitda, PnlData, ReportFilter, SegmentRevenue,
    StageAmount, UnitEconomics,
};
use baltfin_shared::types::{Department, Direction, OperationType};

/// Stateless report calculations. Everything operates on an in-memory
/// snapshot; the storage layer decides what to load.
pub struct PnlService;

impl PnlService {
    /// Computes the headline P&L for the filtered window.
    ///
    /// Classified operations honor the direction filter; monthly-entered
    /// expenses never do (they have no transaction direction), while
    /// monthly-entered revenues do through their category's direction.
    /// Credit payments are filtered by date only.
    #[must_use]
    pub fn compute_pnl(snapshot: &FinanceSnapshot, filter: &ReportFilter) -> PnlData {
        let revenue = Self::operation_total(snapshot, filter, OperationType::Revenue, true)
            + Self::manual_revenue_total(snapshot, filter);
        let cogs = Self::operation_total(snapshot, filter, OperationType::Cogs, true)
            + Self::manual_expense_total(snapshot, filter, OperationType::Cogs);
        let opex = Self::operation_total(snapshot, filter, OperationType::Opex, true)
            + Self::manual_expense_total(snapshot, filter, OperationType::Opex);
        let capex = Self::operation_total(snapshot, filter, OperationType::Capex, true)
            + Self::manual_expense_total(snapshot, filter, OperationType::Capex);

        let gross_profit = revenue - cogs;
        let ebitda = gross_profit - opex;
        let ebitda_percent = if revenue > Decimal::ZERO {
            ebitda / revenue * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let credit_payments: Decimal = snapshot
            .credit_payments
            .iter()
            .filter(|p| filter.contains(p.date))
            .map(|p| p.amount.abs())
            .sum();
        let below_ebitda = Self::operation_total(
            snapshot,
            filter,
            OperationType::BelowEbitdaDividends,
            true,
        ) + Self::operation_total(snapshot, filter, OperationType::BelowEbitdaTransit, true)
            + credit_payments;

        PnlData {
            revenue,
            cogs,
            gross_profit,
            opex,
            ebitda,
            ebitda_percent,
            capex,
            net_after_capex: ebitda - capex,
            below_ebitda,
            credit_payments,
            opening_balance: snapshot.opening_balance,
        }
    }

    /// COGS split by logistics stage. Operations without a stage and
    /// monthly expenses whose category has none are left out, so the
    /// breakdown can sum to less than the P&L COGS line.
    #[must_use]
    pub fn cogs_by_stage(snapshot: &FinanceSnapshot, filter: &ReportFilter) -> Vec<StageAmount> {
        let mut by_stage = BTreeMap::new();

        for op in &snapshot.operations {
            if op.operation_type != OperationType::Cogs
                || !filter.contains(op.date)
                || !filter.direction_matches(op.direction)
            {
                continue;
            }
            if let Some(stage) = op.logistics_stage {
                *by_stage.entry(stage).or_insert(Decimal::ZERO) +=
                    FinancialEntry::Operation(op).contribution();
            }
        }
        for exp in &snapshot.manual_expenses {
            if exp.operation_type != OperationType::Cogs || !filter.contains(exp.period.start()) {
                continue;
            }
            if let Some(stage) = exp.logistics_stage {
                *by_stage.entry(stage).or_insert(Decimal::ZERO) +=
                    FinancialEntry::ManualExpense(exp).contribution();
            }
        }

        by_stage
            .into_iter()
            .map(|(stage, amount)| StageAmount { stage, amount })
            .collect()
    }

    /// OPEX split by department. Direction is ignored here: operating
    /// expenses belong to departments, not to a freight direction.
    /// Monthly expenses without a department land in GENERAL.
    #[must_use]
    pub fn opex_by_department(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
    ) -> Vec<DepartmentAmount> {
        let mut by_dept = BTreeMap::new();

        for op in &snapshot.operations {
            if op.operation_type != OperationType::Opex || !filter.contains(op.date) {
                continue;
            }
            *by_dept.entry(op.department).or_insert(Decimal::ZERO) +=
                FinancialEntry::Operation(op).contribution();
        }
        for exp in &snapshot.manual_expenses {
            if exp.operation_type != OperationType::Opex || !filter.contains(exp.period.start()) {
                continue;
            }
            let dept = exp.department.unwrap_or(Department::General);
            *by_dept.entry(dept).or_insert(Decimal::ZERO) +=
                FinancialEntry::ManualExpense(exp).contribution();
        }

        by_dept
            .into_iter()
            .map(|(dept, amount)| DepartmentAmount { dept, amount })
            .collect()
    }

    /// Revenue split by direction: direction-bound revenue operations
    /// plus monthly revenues through their category's direction.
    /// Operations and monthly figures without a direction are left out.
    #[must_use]
    pub fn revenue_by_direction(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
    ) -> Vec<DirectionAmount> {
        let mut by_direction = BTreeMap::new();

        for op in &snapshot.operations {
            if op.operation_type != OperationType::Revenue || !filter.contains(op.date) {
                continue;
            }
            if let Some(direction) = op.direction {
                *by_direction.entry(direction).or_insert(Decimal::ZERO) +=
                    FinancialEntry::Operation(op).contribution();
            }
        }
        for rev in &snapshot.manual_revenues {
            if !filter.contains(rev.period.start()) {
                continue;
            }
            if let Some(direction) = rev.direction {
                *by_direction.entry(direction).or_insert(Decimal::ZERO) +=
                    FinancialEntry::ManualRevenue(rev).contribution();
            }
        }

        by_direction
            .into_iter()
            .map(|(direction, amount)| DirectionAmount { direction, amount })
            .collect()
    }

    /// Revenue and tonnage split by direction and transport type, from
    /// the monthly sales entries.
    #[must_use]
    pub fn revenue_by_segment(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
    ) -> Vec<SegmentRevenue> {
        let mut by_segment: BTreeMap<_, (Decimal, Decimal)> = BTreeMap::new();

        for sale in &snapshot.sales {
            if !filter.contains(sale.period.start())
                || !filter.direction_matches(Some(sale.direction))
            {
                continue;
            }
            let entry = by_segment
                .entry((sale.direction, sale.transport_type))
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 += sale.revenue;
            entry.1 += sale.weight_kg;
        }

        by_segment
            .into_iter()
            .map(
                |((direction, transport_type), (revenue, weight_kg))| SegmentRevenue {
                    direction,
                    transport_type,
                    revenue,
                    weight_kg,
                },
            )
            .collect()
    }

    /// Per-direction EBITDA with OPEX allocated proportionally to each
    /// direction's revenue share.
    ///
    /// This view is built from classified operations only; monthly
    /// figures carry no usable direction split for allocation. When
    /// neither direction has revenue, no OPEX is allocated at all.
    #[must_use]
    pub fn ebitda_by_direction(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
    ) -> Vec<DirectionEbitda> {
        let directions = [Direction::MskToKgd, Direction::KgdToMsk];

        let revenue: Vec<Decimal> = directions
            .iter()
            .map(|d| Self::direction_op_total(snapshot, filter, OperationType::Revenue, *d))
            .collect();
        let total_revenue: Decimal = revenue.iter().copied().sum();
        let opex_all = Self::operation_total(snapshot, filter, OperationType::Opex, false);

        directions
            .iter()
            .zip(revenue)
            .map(|(direction, revenue)| {
                let cogs =
                    Self::direction_op_total(snapshot, filter, OperationType::Cogs, *direction);
                let share = if total_revenue.is_zero() {
                    Decimal::ZERO
                } else {
                    revenue / total_revenue
                };
                let opex_allocated = opex_all * share;
                DirectionEbitda {
                    direction: *direction,
                    revenue,
                    cogs,
                    opex_allocated,
                    ebitda: revenue - cogs - opex_allocated,
                }
            })
            .collect()
    }

    /// Per-kilogram economics. Tonnage comes from the monthly sales
    /// entries; with no tonnage recorded every per-kg figure is `None`
    /// rather than a division by zero.
    #[must_use]
    pub fn unit_economics(snapshot: &FinanceSnapshot, filter: &ReportFilter) -> UnitEconomics {
        let weight_kg = Self::total_weight(snapshot, filter);
        if weight_kg <= Decimal::ZERO {
            return UnitEconomics {
                weight_kg,
                revenue_per_kg: None,
                cogs_per_kg: None,
                margin_per_kg: None,
                ebitda_per_kg: None,
                cogs_by_stage_per_kg: BTreeMap::new(),
                cogs_by_department_per_kg: BTreeMap::new(),
            };
        }

        let pnl = Self::compute_pnl(snapshot, filter);

        let cogs_by_stage_per_kg = Self::cogs_by_stage(snapshot, filter)
            .into_iter()
            .map(|s| (s.stage, s.amount / weight_kg))
            .collect();

        let mut cogs_by_department = BTreeMap::new();
        for op in &snapshot.operations {
            if op.operation_type != OperationType::Cogs
                || !filter.contains(op.date)
                || !filter.direction_matches(op.direction)
            {
                continue;
            }
            *cogs_by_department
                .entry(op.department)
                .or_insert(Decimal::ZERO) += FinancialEntry::Operation(op).contribution();
        }
        let cogs_by_department_per_kg = cogs_by_department
            .into_iter()
            .map(|(dept, amount)| (dept, amount / weight_kg))
            .collect();

        UnitEconomics {
            weight_kg,
            revenue_per_kg: Some(pnl.revenue / weight_kg),
            cogs_per_kg: Some(pnl.cogs / weight_kg),
            margin_per_kg: Some(pnl.gross_profit / weight_kg),
            ebitda_per_kg: Some(pnl.ebitda / weight_kg),
            cogs_by_stage_per_kg,
            cogs_by_department_per_kg,
        }
    }

    /// Total tonnage from the monthly sales entries, honoring both the
    /// date range and the direction filter.
    #[must_use]
    pub fn total_weight(snapshot: &FinanceSnapshot, filter: &ReportFilter) -> Decimal {
        snapshot
            .sales
            .iter()
            .filter(|s| filter.contains(s.period.start()))
            .filter(|s| filter.direction_matches(Some(s.direction)))
            .map(|s| s.weight_kg)
            .sum()
    }

    // =========================================================================
    // Internal sums
    // =========================================================================

    fn operation_total(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
        operation_type: OperationType,
        use_direction: bool,
    ) -> Decimal {
        snapshot
            .operations
            .iter()
            .filter(|op| op.operation_type == operation_type)
            .filter(|op| filter.contains(op.date))
            .filter(|op| !use_direction || filter.direction_matches(op.direction))
            .map(|op| FinancialEntry::Operation(op).contribution())
            .sum()
    }

    fn direction_op_total(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
        operation_type: OperationType,
        direction: Direction,
    ) -> Decimal {
        snapshot
            .operations
            .iter()
            .filter(|op| op.operation_type == operation_type)
            .filter(|op| filter.contains(op.date))
            .filter(|op| op.direction == Some(direction))
            .map(|op| FinancialEntry::Operation(op).contribution())
            .sum()
    }

    fn manual_revenue_total(snapshot: &FinanceSnapshot, filter: &ReportFilter) -> Decimal {
        snapshot
            .manual_revenues
            .iter()
            .filter(|rev| filter.contains(rev.period.start()))
            .filter(|rev| filter.direction_matches(rev.direction))
            .map(|rev| FinancialEntry::ManualRevenue(rev).contribution())
            .sum()
    }

    fn manual_expense_total(
        snapshot: &FinanceSnapshot,
        filter: &ReportFilter,
        operation_type: OperationType,
    ) -> Decimal {
        snapshot
            .manual_expenses
            .iter()
            .filter(|exp| exp.operation_type == operation_type)
            .filter(|exp| filter.contains(exp.period.start()))
            .map(|exp| FinancialEntry::ManualExpense(exp).contribution())
            .sum()
    }
}
