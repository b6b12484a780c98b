//! P&L aggregation, breakdowns, and unit economics.

pub mod service;
pub mod snapshot;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::PnlService;
pub use snapshot::{
    CreditPaymentRecord, FinanceSnapshot, FinancialEntry, ManualExpenseRecord,
    ManualRevenueRecord, OperationRecord, SaleRecord,
};
pub use types::{
    DepartmentAmount, DirectionAmount, DirectionEbitda, PnlData, ReportFilter, SegmentRevenue,
    StageAmount, UnitEconomics,
};
