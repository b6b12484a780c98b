//! Read-only financial records the storage layer loads for reporting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use baltfin_shared::types::{
    CreditPaymentKind, Department, Direction, LogisticsStage, OperationType, Period,
    TransportType,
};

/// A classified bank operation. Amounts are signed: negative for
/// outflows, positive for inflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    /// Transaction date.
    pub date: NaiveDate,
    /// Signed amount.
    pub amount: Decimal,
    /// Operation type.
    pub operation_type: OperationType,
    /// Department.
    pub department: Department,
    /// Logistics stage, for pipeline costs.
    pub logistics_stage: Option<LogisticsStage>,
    /// Direction, when the operation is direction-bound.
    pub direction: Option<Direction>,
}

/// A monthly-entered revenue figure, carrying its category's direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRevenueRecord {
    /// Month the figure belongs to.
    pub period: Period,
    /// Entered amount, positive.
    pub amount: Decimal,
    /// The revenue category's direction.
    pub direction: Option<Direction>,
}

/// A monthly-entered expense figure, carrying its category's
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualExpenseRecord {
    /// Month the figure belongs to.
    pub period: Period,
    /// Entered amount, positive.
    pub amount: Decimal,
    /// The expense category's type (COGS, OPEX, or CAPEX).
    pub operation_type: OperationType,
    /// The expense category's logistics stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// The expense category's department.
    pub department: Option<Department>,
}

/// A monthly sales entry for one direction and transport type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Month the entry belongs to.
    pub period: Period,
    /// Direction.
    pub direction: Direction,
    /// Transport type.
    pub transport_type: TransportType,
    /// Tonnage carried, kilograms.
    pub weight_kg: Decimal,
    /// Revenue for the segment.
    pub revenue: Decimal,
}

/// A scheduled credit or leasing payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPaymentRecord {
    /// Payment date.
    pub date: NaiveDate,
    /// Payment amount, positive.
    pub amount: Decimal,
    /// Credit or leasing.
    pub kind: CreditPaymentKind,
}

/// Everything the reporting services read, loaded in one pass.
#[derive(Debug, Clone, Default)]
pub struct FinanceSnapshot {
    /// Classified operations.
    pub operations: Vec<OperationRecord>,
    /// Monthly-entered revenues.
    pub manual_revenues: Vec<ManualRevenueRecord>,
    /// Monthly-entered expenses.
    pub manual_expenses: Vec<ManualExpenseRecord>,
    /// Monthly sales entries.
    pub sales: Vec<SaleRecord>,
    /// Credit and leasing payments.
    pub credit_payments: Vec<CreditPaymentRecord>,
    /// Opening cash balance for the report window's starting month.
    pub opening_balance: Option<Decimal>,
}

/// A record contributing to a P&L line, either flow.
///
/// Operations carry bank signs, monthly figures are entered as positive
/// magnitudes; `contribution` is the single place that difference is
/// normalized.
#[derive(Debug, Clone, Copy)]
pub enum FinancialEntry<'a> {
    /// A classified operation.
    Operation(&'a OperationRecord),
    /// A monthly-entered revenue.
    ManualRevenue(&'a ManualRevenueRecord),
    /// A monthly-entered expense.
    ManualExpense(&'a ManualExpenseRecord),
}

impl FinancialEntry<'_> {
    /// The positive magnitude this record adds to its P&L line.
    #[must_use]
    pub fn contribution(&self) -> Decimal {
        match self {
            Self::Operation(op) => op.amount.abs(),
            Self::ManualRevenue(rev) => rev.amount,
            Self::ManualExpense(exp) => exp.amount,
        }
    }
}
