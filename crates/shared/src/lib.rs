//! Shared domain types, errors, and configuration for Baltfin.
//!
//! This crate provides common types used across all other crates:
//! - Domain enums (operation type, department, logistics stage, direction)
//! - The month-level `Period` key used by manual entries and statements
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{
    CreditPaymentKind, Department, Direction, LogisticsStage, OperationType, Period, TransportType,
};
