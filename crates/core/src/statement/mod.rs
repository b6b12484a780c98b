//! Bank statement row parsing and ingestion.
//!
//! The spreadsheet itself is parsed by an external collaborator; this
//! module consumes the normalized rows it produces and turns them into
//! per-counterparty expense aggregates (for the statement review screen)
//! and classified operations (for the P&L).

pub mod ingest;
pub mod parse;

pub use ingest::{
    aggregate_expenses, batch_period, build_operations, CounterpartyTotal, IngestOutcome,
    NewOperation, ParsedRow, NO_COUNTERPARTY, UNKNOWN_COUNTERPARTY,
};
pub use parse::{detect_flow, parse_amount, parse_row_date, FlowKind};
