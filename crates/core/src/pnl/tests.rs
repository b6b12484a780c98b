//! Report calculation tests.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pnl::{
    CreditPaymentRecord, FinanceSnapshot, ManualExpenseRecord, ManualRevenueRecord,
    OperationRecord, PnlService, ReportFilter, SaleRecord,
};
use baltfin_shared::types::{
    CreditPaymentKind, Department, Direction, LogisticsStage, OperationType, Period,
    TransportType,
};

fn march() -> ReportFilter {
    ReportFilter::for_range(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
}

fn op(
    day: u32,
    amount: Decimal,
    operation_type: OperationType,
    direction: Option<Direction>,
) -> OperationRecord {
    OperationRecord {
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        amount,
        operation_type,
        department: Department::General,
        logistics_stage: None,
        direction,
    }
}

fn sale(direction: Direction, transport_type: TransportType, weight_kg: Decimal) -> SaleRecord {
    SaleRecord {
        period: Period::from_ym(2024, 3).unwrap(),
        direction,
        transport_type,
        weight_kg,
        revenue: dec!(0),
    }
}

/// A month with every data source populated.
fn mixed_snapshot() -> FinanceSnapshot {
    let period = Period::from_ym(2024, 3).unwrap();
    FinanceSnapshot {
        operations: vec![
            op(5, dec!(100000), OperationType::Revenue, Some(Direction::MskToKgd)),
            op(7, dec!(-40000), OperationType::Cogs, Some(Direction::MskToKgd)),
            op(9, dec!(-25000), OperationType::Opex, None),
            op(11, dec!(-10000), OperationType::Capex, None),
            op(13, dec!(-5000), OperationType::BelowEbitdaDividends, None),
        ],
        manual_revenues: vec![ManualRevenueRecord {
            period,
            amount: dec!(20000),
            direction: Some(Direction::KgdToMsk),
        }],
        manual_expenses: vec![
            ManualExpenseRecord {
                period,
                amount: dec!(10000),
                operation_type: OperationType::Cogs,
                logistics_stage: Some(LogisticsStage::Mainline),
                department: None,
            },
            ManualExpenseRecord {
                period,
                amount: dec!(5000),
                operation_type: OperationType::Opex,
                logistics_stage: None,
                department: Some(Department::Administration),
            },
        ],
        sales: vec![],
        credit_payments: vec![CreditPaymentRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            amount: dec!(3000),
            kind: CreditPaymentKind::Leasing,
        }],
        opening_balance: Some(dec!(50000)),
    }
}

#[test]
fn test_pnl_combines_operations_and_manual_figures() {
    let pnl = PnlService::compute_pnl(&mixed_snapshot(), &march());

    assert_eq!(pnl.revenue, dec!(120000));
    assert_eq!(pnl.cogs, dec!(50000));
    assert_eq!(pnl.gross_profit, dec!(70000));
    assert_eq!(pnl.opex, dec!(30000));
    assert_eq!(pnl.ebitda, dec!(40000));
    assert_eq!(pnl.ebitda_percent.round_dp(2), dec!(33.33));
    assert_eq!(pnl.capex, dec!(10000));
    assert_eq!(pnl.net_after_capex, dec!(30000));
    assert_eq!(pnl.credit_payments, dec!(3000));
    assert_eq!(pnl.below_ebitda, dec!(8000));
    assert_eq!(pnl.opening_balance, Some(dec!(50000)));
}

#[test]
fn test_pnl_date_range_excludes_outside_rows() {
    let mut snapshot = mixed_snapshot();
    snapshot.operations.push(OperationRecord {
        date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        ..op(1, dec!(99999), OperationType::Revenue, None)
    });
    let pnl = PnlService::compute_pnl(&snapshot, &march());
    assert_eq!(pnl.revenue, dec!(120000));
}

#[test]
fn test_pnl_direction_filter() {
    let mut filter = march();
    filter.direction = Some(Direction::MskToKgd);
    let pnl = PnlService::compute_pnl(&mixed_snapshot(), &filter);

    // The KGD-bound manual revenue drops out, and so do the
    // direction-less OPEX/CAPEX operations.
    assert_eq!(pnl.revenue, dec!(100000));
    assert_eq!(pnl.cogs, dec!(50000)); // COGS op matches, manual expense always counts
    assert_eq!(pnl.opex, dec!(5000)); // only the manual expense survives
    assert_eq!(pnl.capex, dec!(0));
    // credit payments ignore the direction filter
    assert_eq!(pnl.credit_payments, dec!(3000));
}

#[test]
fn test_pnl_zero_revenue_gives_zero_percent() {
    let snapshot = FinanceSnapshot {
        operations: vec![op(5, dec!(-1000), OperationType::Opex, None)],
        ..FinanceSnapshot::default()
    };
    let pnl = PnlService::compute_pnl(&snapshot, &march());
    assert_eq!(pnl.revenue, dec!(0));
    assert_eq!(pnl.ebitda_percent, dec!(0));
}

#[test]
fn test_cogs_by_stage_skips_stageless_costs() {
    let mut snapshot = mixed_snapshot();
    snapshot.operations.push(OperationRecord {
        logistics_stage: Some(LogisticsStage::LastMile),
        ..op(8, dec!(-7000), OperationType::Cogs, None)
    });

    let stages = PnlService::cogs_by_stage(&snapshot, &march());
    assert_eq!(stages.len(), 2);
    // BTreeMap iteration follows the pipeline order
    assert_eq!(stages[0].stage, LogisticsStage::Mainline);
    assert_eq!(stages[0].amount, dec!(10000));
    assert_eq!(stages[1].stage, LogisticsStage::LastMile);
    assert_eq!(stages[1].amount, dec!(7000));
}

#[test]
fn test_opex_by_department_ignores_direction_filter() {
    let mut filter = march();
    filter.direction = Some(Direction::KgdToMsk);

    let depts = PnlService::opex_by_department(&mixed_snapshot(), &filter);
    let total: Decimal = depts.iter().map(|d| d.amount).sum();
    assert_eq!(total, dec!(30000));
    assert!(depts
        .iter()
        .any(|d| d.dept == Department::Administration && d.amount == dec!(5000)));
    assert!(depts
        .iter()
        .any(|d| d.dept == Department::General && d.amount == dec!(25000)));
}

#[test]
fn test_revenue_by_direction_merges_sources() {
    let split = PnlService::revenue_by_direction(&mixed_snapshot(), &march());
    assert_eq!(split.len(), 2);
    assert!(split
        .iter()
        .any(|d| d.direction == Direction::MskToKgd && d.amount == dec!(100000)));
    assert!(split
        .iter()
        .any(|d| d.direction == Direction::KgdToMsk && d.amount == dec!(20000)));
}

#[test]
fn test_ebitda_by_direction_allocates_opex_by_revenue_share() {
    let snapshot = FinanceSnapshot {
        operations: vec![
            op(1, dec!(60000), OperationType::Revenue, Some(Direction::MskToKgd)),
            op(2, dec!(40000), OperationType::Revenue, Some(Direction::KgdToMsk)),
            op(3, dec!(-20000), OperationType::Cogs, Some(Direction::MskToKgd)),
            op(4, dec!(-10000), OperationType::Cogs, Some(Direction::KgdToMsk)),
            op(5, dec!(-10000), OperationType::Opex, None),
        ],
        ..FinanceSnapshot::default()
    };

    let split = PnlService::ebitda_by_direction(&snapshot, &march());
    assert_eq!(split.len(), 2);

    let msk = &split[0];
    assert_eq!(msk.direction, Direction::MskToKgd);
    assert_eq!(msk.opex_allocated, dec!(6000));
    assert_eq!(msk.ebitda, dec!(34000));

    let kgd = &split[1];
    assert_eq!(kgd.direction, Direction::KgdToMsk);
    assert_eq!(kgd.opex_allocated, dec!(4000));
    assert_eq!(kgd.ebitda, dec!(26000));
}

#[test]
fn test_ebitda_by_direction_without_revenue_allocates_nothing() {
    let snapshot = FinanceSnapshot {
        operations: vec![op(5, dec!(-10000), OperationType::Opex, None)],
        ..FinanceSnapshot::default()
    };
    let split = PnlService::ebitda_by_direction(&snapshot, &march());
    for entry in split {
        assert_eq!(entry.opex_allocated, dec!(0));
        assert_eq!(entry.ebitda, dec!(0));
    }
}

#[test]
fn test_unit_economics_per_kg() {
    let mut snapshot = mixed_snapshot();
    snapshot.sales = vec![
        sale(Direction::MskToKgd, TransportType::Auto, dec!(8000)),
        sale(Direction::KgdToMsk, TransportType::Ferry, dec!(2000)),
    ];

    let unit = PnlService::unit_economics(&snapshot, &march());
    assert_eq!(unit.weight_kg, dec!(10000));
    assert_eq!(unit.revenue_per_kg, Some(dec!(12)));
    assert_eq!(unit.cogs_per_kg, Some(dec!(5)));
    assert_eq!(unit.margin_per_kg, Some(dec!(7)));
    assert_eq!(unit.ebitda_per_kg, Some(dec!(4)));
    assert_eq!(
        unit.cogs_by_stage_per_kg.get(&LogisticsStage::Mainline),
        Some(&dec!(1))
    );
    assert_eq!(
        unit.cogs_by_department_per_kg.get(&Department::General),
        Some(&dec!(4))
    );
}

#[test]
fn test_unit_economics_without_tonnage() {
    let unit = PnlService::unit_economics(&mixed_snapshot(), &march());
    assert_eq!(unit.weight_kg, dec!(0));
    assert_eq!(unit.revenue_per_kg, None);
    assert_eq!(unit.margin_per_kg, None);
    assert!(unit.cogs_by_stage_per_kg.is_empty());
    assert!(unit.cogs_by_department_per_kg.is_empty());
}

#[test]
fn test_total_weight_honors_direction_filter() {
    let snapshot = FinanceSnapshot {
        sales: vec![
            sale(Direction::MskToKgd, TransportType::Auto, dec!(8000)),
            sale(Direction::KgdToMsk, TransportType::Ferry, dec!(2000)),
        ],
        ..FinanceSnapshot::default()
    };
    let mut filter = march();
    filter.direction = Some(Direction::KgdToMsk);
    assert_eq!(PnlService::total_weight(&snapshot, &filter), dec!(2000));
}

#[test]
fn test_revenue_by_segment_groups_sales() {
    let mut first = sale(Direction::MskToKgd, TransportType::Auto, dec!(5000));
    first.revenue = dec!(90000);
    let mut second = sale(Direction::MskToKgd, TransportType::Auto, dec!(3000));
    second.revenue = dec!(60000);
    let mut ferry = sale(Direction::MskToKgd, TransportType::Ferry, dec!(1000));
    ferry.revenue = dec!(30000);

    let snapshot = FinanceSnapshot {
        sales: vec![first, second, ferry],
        ..FinanceSnapshot::default()
    };
    let segments = PnlService::revenue_by_segment(&snapshot, &march());
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].transport_type, TransportType::Auto);
    assert_eq!(segments[0].revenue, dec!(150000));
    assert_eq!(segments[0].weight_kg, dec!(8000));
    assert_eq!(segments[1].transport_type, TransportType::Ferry);
    assert_eq!(segments[1].revenue, dec!(30000));
}

// =============================================================================
// Property tests
// =============================================================================

fn arb_operation() -> impl Strategy<Value = OperationRecord> {
    let types = [
        OperationType::Revenue,
        OperationType::Cogs,
        OperationType::Opex,
        OperationType::Capex,
        OperationType::BelowEbitdaDividends,
        OperationType::BelowEbitdaTransit,
    ];
    (
        1u32..=12,
        1u32..=28,
        -1_000_000i64..=1_000_000,
        0..types.len(),
        prop_oneof![
            Just(None),
            Just(Some(Direction::MskToKgd)),
            Just(Some(Direction::KgdToMsk)),
        ],
    )
        .prop_map(move |(month, day, amount, type_idx, direction)| OperationRecord {
            date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
            amount: Decimal::from(amount),
            operation_type: types[type_idx],
            department: Department::General,
            logistics_stage: None,
            direction,
        })
}

proptest! {
    #[test]
    fn prop_pnl_identities_hold(ops in prop::collection::vec(arb_operation(), 0..50)) {
        let snapshot = FinanceSnapshot { operations: ops, ..FinanceSnapshot::default() };
        let filter = ReportFilter::default();
        let pnl = PnlService::compute_pnl(&snapshot, &filter);

        prop_assert_eq!(pnl.gross_profit, pnl.revenue - pnl.cogs);
        prop_assert_eq!(pnl.ebitda, pnl.gross_profit - pnl.opex);
        prop_assert_eq!(pnl.net_after_capex, pnl.ebitda - pnl.capex);
        if pnl.revenue.is_zero() {
            prop_assert_eq!(pnl.ebitda_percent, Decimal::ZERO);
        }
    }

    #[test]
    fn prop_pnl_lines_are_nonnegative(ops in prop::collection::vec(arb_operation(), 0..50)) {
        let snapshot = FinanceSnapshot { operations: ops, ..FinanceSnapshot::default() };
        let pnl = PnlService::compute_pnl(&snapshot, &ReportFilter::default());

        prop_assert!(pnl.revenue >= Decimal::ZERO);
        prop_assert!(pnl.cogs >= Decimal::ZERO);
        prop_assert!(pnl.opex >= Decimal::ZERO);
        prop_assert!(pnl.capex >= Decimal::ZERO);
        prop_assert!(pnl.below_ebitda >= Decimal::ZERO);
    }

    #[test]
    fn prop_half_year_sums_match_full_year(ops in prop::collection::vec(arb_operation(), 0..50)) {
        let snapshot = FinanceSnapshot { operations: ops, ..FinanceSnapshot::default() };
        let full = ReportFilter::for_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );
        let h1 = ReportFilter::for_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        let h2 = ReportFilter::for_range(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );

        let whole = PnlService::compute_pnl(&snapshot, &full);
        let first = PnlService::compute_pnl(&snapshot, &h1);
        let second = PnlService::compute_pnl(&snapshot, &h2);

        prop_assert_eq!(whole.revenue, first.revenue + second.revenue);
        prop_assert_eq!(whole.cogs, first.cogs + second.cogs);
        prop_assert_eq!(whole.ebitda, first.ebitda + second.ebitda);
    }

    #[test]
    fn prop_opex_allocation_is_complete(ops in prop::collection::vec(arb_operation(), 1..50)) {
        let snapshot = FinanceSnapshot { operations: ops, ..FinanceSnapshot::default() };
        let filter = ReportFilter::default();
        let split = PnlService::ebitda_by_direction(&snapshot, &filter);
        let total_revenue: Decimal = split.iter().map(|d| d.revenue).sum();

        let allocated: Decimal = split.iter().map(|d| d.opex_allocated).sum();
        if total_revenue.is_zero() {
            prop_assert_eq!(allocated, Decimal::ZERO);
        } else {
            // the two shares sum to 1, so allocation covers all of OPEX
            let opex_all: Decimal = snapshot
                .operations
                .iter()
                .filter(|op| op.operation_type == OperationType::Opex)
                .map(|op| op.amount.abs())
                .sum();
            prop_assert!((allocated - opex_all).abs() < dec!(0.000001));
        }
    }
}
