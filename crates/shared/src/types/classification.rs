//! Domain classification enums.
//!
//! These enums are the chart-of-accounts-like taxonomy of the business:
//! every operation carries an operation type and a department, logistics
//! costs additionally carry a pipeline stage, and revenue is segmented by
//! shipment direction and transport type.
//!
//! Wire names are SCREAMING_SNAKE_CASE to match the stored values; the
//! `label` methods return the Russian display names used by the UI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown enum value.
#[derive(Debug, Clone, Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

macro_rules! impl_str_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in canonical order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored (wire) name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownValue(other.to_string())),
                }
            }
        }
    };
}

/// Operation type: where an amount lands in the P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    /// Revenue (positive amounts).
    Revenue,
    /// Cost of goods sold (logistics pipeline costs).
    Cogs,
    /// Operating expenses.
    Opex,
    /// Capital expenditures.
    Capex,
    /// Dividends, excluded from EBITDA.
    BelowEbitdaDividends,
    /// Transit flows (credits/cash), excluded from EBITDA.
    BelowEbitdaTransit,
}

impl_str_enum!(OperationType {
    Revenue => "REVENUE",
    Cogs => "COGS",
    Opex => "OPEX",
    Capex => "CAPEX",
    BelowEbitdaDividends => "BELOW_EBITDA_DIVIDENDS",
    BelowEbitdaTransit => "BELOW_EBITDA_TRANSIT",
});

impl OperationType {
    /// Returns true for the two below-EBITDA variants.
    #[must_use]
    pub const fn is_below_ebitda(self) -> bool {
        matches!(self, Self::BelowEbitdaDividends | Self::BelowEbitdaTransit)
    }
}

/// Department an operation or expense category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    /// Moscow-side logistics.
    LogisticsMsk,
    /// Kaliningrad-side logistics.
    LogisticsKgd,
    /// Administration.
    Administration,
    /// Executive management.
    Direction,
    /// IT.
    It,
    /// Sales.
    Sales,
    /// Customer service.
    Service,
    /// Default bucket for unclassified operations.
    General,
}

impl_str_enum!(Department {
    LogisticsMsk => "LOGISTICS_MSK",
    LogisticsKgd => "LOGISTICS_KGD",
    Administration => "ADMINISTRATION",
    Direction => "DIRECTION",
    It => "IT",
    Sales => "SALES",
    Service => "SERVICE",
    General => "GENERAL",
});

impl Department {
    /// Russian display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LogisticsMsk => "Логистика Москва",
            Self::LogisticsKgd => "Логистика КГД",
            Self::Administration => "Администрация",
            Self::Direction => "Дирекция",
            Self::It => "IT",
            Self::Sales => "Продажи",
            Self::Service => "Сервис",
            Self::General => "Общее",
        }
    }
}

/// Logistics pipeline stage, used to break down COGS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsStage {
    /// Pickup from the client.
    Pickup,
    /// Departure warehouse handling.
    DepartureWarehouse,
    /// Mainline haul between the cities.
    Mainline,
    /// Arrival warehouse handling.
    ArrivalWarehouse,
    /// Last-mile delivery.
    LastMile,
}

impl_str_enum!(LogisticsStage {
    Pickup => "PICKUP",
    DepartureWarehouse => "DEPARTURE_WAREHOUSE",
    Mainline => "MAINLINE",
    ArrivalWarehouse => "ARRIVAL_WAREHOUSE",
    LastMile => "LAST_MILE",
});

impl LogisticsStage {
    /// Russian display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Заборная логистика",
            Self::DepartureWarehouse => "Склад отправления",
            Self::Mainline => "Магистраль",
            Self::ArrivalWarehouse => "Склад получения",
            Self::LastMile => "Последняя миля",
        }
    }
}

/// Shipment direction between the two cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Moscow to Kaliningrad.
    MskToKgd,
    /// Kaliningrad to Moscow.
    KgdToMsk,
}

impl_str_enum!(Direction {
    MskToKgd => "MSK_TO_KGD",
    KgdToMsk => "KGD_TO_MSK",
});

impl Direction {
    /// Russian display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MskToKgd => "МСК → КГД",
            Self::KgdToMsk => "КГД → МСК",
        }
    }
}

/// Transport type for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    /// Road transport.
    Auto,
    /// Ferry transport.
    Ferry,
}

impl_str_enum!(TransportType {
    Auto => "AUTO",
    Ferry => "FERRY",
});

impl TransportType {
    /// Russian display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "авто",
            Self::Ferry => "паром",
        }
    }
}

/// Kind of a below-EBITDA credit payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditPaymentKind {
    /// Loan repayment.
    Credit,
    /// Leasing payment.
    Leasing,
}

impl_str_enum!(CreditPaymentKind {
    Credit => "CREDIT",
    Leasing => "LEASING",
});

/// An expense-entry subdivision: a page-level grouping mapping to a
/// department and an optional logistics stage.
#[derive(Debug, Clone, Copy)]
pub struct Subdivision {
    /// Stable identifier used by the UI and the from-statement endpoint.
    pub id: &'static str,
    /// Russian display label.
    pub label: &'static str,
    /// Department this subdivision belongs to.
    pub department: Department,
    /// Logistics stage, for pipeline subdivisions.
    pub logistics_stage: Option<LogisticsStage>,
}

/// Expense-entry subdivisions, matching the manual-entry screens.
pub const SUBDIVISIONS: [Subdivision; 7] = [
    Subdivision {
        id: "pickup_msk",
        label: "Заборная логистика Москва",
        department: Department::LogisticsMsk,
        logistics_stage: Some(LogisticsStage::Pickup),
    },
    Subdivision {
        id: "warehouse_msk",
        label: "Склад Москва",
        department: Department::LogisticsMsk,
        logistics_stage: Some(LogisticsStage::DepartureWarehouse),
    },
    Subdivision {
        id: "mainline",
        label: "Магистраль",
        department: Department::LogisticsMsk,
        logistics_stage: Some(LogisticsStage::Mainline),
    },
    Subdivision {
        id: "warehouse_kgd",
        label: "Склад Калининград",
        department: Department::LogisticsKgd,
        logistics_stage: Some(LogisticsStage::ArrivalWarehouse),
    },
    Subdivision {
        id: "lastmile_kgd",
        label: "Последняя миля Калининград",
        department: Department::LogisticsKgd,
        logistics_stage: Some(LogisticsStage::LastMile),
    },
    Subdivision {
        id: "administration",
        label: "Администрация",
        department: Department::Administration,
        logistics_stage: None,
    },
    Subdivision {
        id: "direction",
        label: "Дирекция",
        department: Department::Direction,
        logistics_stage: None,
    },
];

/// Looks up a subdivision by its identifier.
#[must_use]
pub fn find_subdivision(id: &str) -> Option<&'static Subdivision> {
    SUBDIVISIONS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for op in OperationType::ALL {
            assert_eq!(op.as_str().parse::<OperationType>().unwrap(), *op);
        }
        for d in Department::ALL {
            assert_eq!(d.as_str().parse::<Department>().unwrap(), *d);
        }
        for s in LogisticsStage::ALL {
            assert_eq!(s.as_str().parse::<LogisticsStage>().unwrap(), *s);
        }
        for d in Direction::ALL {
            assert_eq!(d.as_str().parse::<Direction>().unwrap(), *d);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Direction::MskToKgd).unwrap(),
            "\"MSK_TO_KGD\""
        );
        assert_eq!(
            serde_json::to_string(&OperationType::BelowEbitdaDividends).unwrap(),
            "\"BELOW_EBITDA_DIVIDENDS\""
        );
        let parsed: LogisticsStage = serde_json::from_str("\"DEPARTURE_WAREHOUSE\"").unwrap();
        assert_eq!(parsed, LogisticsStage::DepartureWarehouse);
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert!("REVENUES".parse::<OperationType>().is_err());
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_subdivision_lookup() {
        let sub = find_subdivision("mainline").unwrap();
        assert_eq!(sub.department, Department::LogisticsMsk);
        assert_eq!(sub.logistics_stage, Some(LogisticsStage::Mainline));
        assert!(find_subdivision("unknown").is_none());
    }
}
