//! Core business logic for Baltfin.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All calculations run over read-only snapshots loaded by
//! the storage layer.
//!
//! # Modules
//!
//! - `classify` - Counterparty-based classification rules
//! - `statement` - Bank statement row parsing and ingestion
//! - `pnl` - P&L aggregation and unit economics
//! - `timeseries` - Calendar-month windows for chart series
//! - `alerts` - Threshold-based alerting

pub mod alerts;
pub mod classify;
pub mod pnl;
pub mod statement;
pub mod timeseries;
