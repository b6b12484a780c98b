//! Database-side enums mirroring the domain classification enums.
//!
//! The stored string values are identical to the wire names in
//! `baltfin_shared::types`, so the `From` conversions below are total in
//! both directions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use baltfin_shared::types;

/// Operation type column values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "operation_type")]
pub enum OperationType {
    /// Revenue.
    #[sea_orm(string_value = "REVENUE")]
    Revenue,
    /// Cost of goods sold.
    #[sea_orm(string_value = "COGS")]
    Cogs,
    /// Operating expenses.
    #[sea_orm(string_value = "OPEX")]
    Opex,
    /// Capital expenditures.
    #[sea_orm(string_value = "CAPEX")]
    Capex,
    /// Dividends below the EBITDA line.
    #[sea_orm(string_value = "BELOW_EBITDA_DIVIDENDS")]
    BelowEbitdaDividends,
    /// Transit flows below the EBITDA line.
    #[sea_orm(string_value = "BELOW_EBITDA_TRANSIT")]
    BelowEbitdaTransit,
}

/// Department column values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "department")]
pub enum Department {
    /// Moscow-side logistics.
    #[sea_orm(string_value = "LOGISTICS_MSK")]
    LogisticsMsk,
    /// Kaliningrad-side logistics.
    #[sea_orm(string_value = "LOGISTICS_KGD")]
    LogisticsKgd,
    /// Administration.
    #[sea_orm(string_value = "ADMINISTRATION")]
    Administration,
    /// Executive management.
    #[sea_orm(string_value = "DIRECTION")]
    Direction,
    /// IT.
    #[sea_orm(string_value = "IT")]
    It,
    /// Sales.
    #[sea_orm(string_value = "SALES")]
    Sales,
    /// Customer service.
    #[sea_orm(string_value = "SERVICE")]
    Service,
    /// Default bucket.
    #[sea_orm(string_value = "GENERAL")]
    General,
}

/// Logistics stage column values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "logistics_stage")]
pub enum LogisticsStage {
    /// Pickup from the client.
    #[sea_orm(string_value = "PICKUP")]
    Pickup,
    /// Departure warehouse handling.
    #[sea_orm(string_value = "DEPARTURE_WAREHOUSE")]
    DepartureWarehouse,
    /// Mainline haul.
    #[sea_orm(string_value = "MAINLINE")]
    Mainline,
    /// Arrival warehouse handling.
    #[sea_orm(string_value = "ARRIVAL_WAREHOUSE")]
    ArrivalWarehouse,
    /// Last-mile delivery.
    #[sea_orm(string_value = "LAST_MILE")]
    LastMile,
}

/// Direction column values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "direction")]
pub enum Direction {
    /// Moscow to Kaliningrad.
    #[sea_orm(string_value = "MSK_TO_KGD")]
    MskToKgd,
    /// Kaliningrad to Moscow.
    #[sea_orm(string_value = "KGD_TO_MSK")]
    KgdToMsk,
}

/// Transport type column values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transport_type")]
pub enum TransportType {
    /// Road transport.
    #[sea_orm(string_value = "AUTO")]
    Auto,
    /// Ferry transport.
    #[sea_orm(string_value = "FERRY")]
    Ferry,
}

/// Credit payment kind column values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "credit_payment_kind")]
pub enum CreditPaymentKind {
    /// Loan repayment.
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    /// Leasing payment.
    #[sea_orm(string_value = "LEASING")]
    Leasing,
}

// ============================================================================
// Conversions to and from the domain enums
// ============================================================================

macro_rules! convert_enum {
    ($db:ident, $domain:path { $($variant:ident),+ $(,)? }) => {
        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $(<$domain>::$variant => Self::$variant),+
                }
            }
        }

        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant),+
                }
            }
        }
    };
}

convert_enum!(OperationType, types::OperationType {
    Revenue,
    Cogs,
    Opex,
    Capex,
    BelowEbitdaDividends,
    BelowEbitdaTransit,
});

convert_enum!(Department, types::Department {
    LogisticsMsk,
    LogisticsKgd,
    Administration,
    Direction,
    It,
    Sales,
    Service,
    General,
});

convert_enum!(LogisticsStage, types::LogisticsStage {
    Pickup,
    DepartureWarehouse,
    Mainline,
    ArrivalWarehouse,
    LastMile,
});

convert_enum!(Direction, types::Direction { MskToKgd, KgdToMsk });

convert_enum!(TransportType, types::TransportType { Auto, Ferry });

convert_enum!(CreditPaymentKind, types::CreditPaymentKind { Credit, Leasing });
