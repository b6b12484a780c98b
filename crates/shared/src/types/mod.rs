//! Shared domain types.

pub mod classification;
pub mod period;

pub use classification::{
    find_subdivision, CreditPaymentKind, Department, Direction, LogisticsStage, OperationType,
    Subdivision, TransportType, UnknownValue, SUBDIVISIONS,
};
pub use period::Period;
