//! Counterparty-based classification rules.
//!
//! A classification rule maps a counterparty name to a P&L classification
//! (operation type, department, logistics stage, direction). The matcher is
//! deliberately fuzzy: bank statements abbreviate and decorate counterparty
//! names ("ТК Деловые линии" vs a rule for "Деловые линии"), so a rule
//! matches when either name contains the other, case-insensitively.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use baltfin_shared::types::{Department, Direction, LogisticsStage, OperationType};

/// A stored classification rule, keyed by counterparty name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRule {
    /// Rule identifier.
    pub id: Uuid,
    /// Counterparty key (unique, case-insensitive substring-matchable).
    pub counterparty: String,
    /// Optional payment-purpose pattern (informational).
    pub purpose_pattern: Option<String>,
    /// Target operation type.
    pub operation_type: OperationType,
    /// Target department.
    pub department: Department,
    /// Target logistics stage, for pipeline costs.
    pub logistics_stage: Option<LogisticsStage>,
    /// Target direction, when the counterparty is direction-bound.
    pub direction: Option<Direction>,
}

/// The classification applied to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Operation type.
    pub operation_type: OperationType,
    /// Department.
    pub department: Department,
    /// Logistics stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// Direction.
    pub direction: Option<Direction>,
}

impl Classification {
    /// Default classification for counterparties no rule matches:
    /// a general operating expense.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            operation_type: OperationType::Opex,
            department: Department::General,
            logistics_stage: None,
            direction: None,
        }
    }
}

impl From<&ClassificationRule> for Classification {
    fn from(rule: &ClassificationRule) -> Self {
        Self {
            operation_type: rule.operation_type,
            department: rule.department,
            logistics_stage: rule.logistics_stage,
            direction: rule.direction,
        }
    }
}

/// Finds the first rule matching a counterparty name.
///
/// A rule matches when the rule's counterparty key is a substring of the
/// transaction counterparty or vice versa, compared case-insensitively.
/// Rules are checked in slice order and the first match wins, so the
/// result is sensitive to storage order when several rules could match.
#[must_use]
pub fn match_rule<'a>(
    counterparty: &str,
    rules: &'a [ClassificationRule],
) -> Option<&'a ClassificationRule> {
    let needle = counterparty.to_lowercase();
    rules.iter().find(|rule| {
        let key = rule.counterparty.to_lowercase();
        needle.contains(&key) || key.contains(&needle)
    })
}

/// Classifies a counterparty: the first matching rule's classification,
/// or the OPEX/GENERAL fallback when nothing matches.
#[must_use]
pub fn classify(counterparty: &str, rules: &[ClassificationRule]) -> Classification {
    match_rule(counterparty, rules)
        .map_or_else(Classification::fallback, Classification::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(counterparty: &str, operation_type: OperationType) -> ClassificationRule {
        ClassificationRule {
            id: Uuid::new_v4(),
            counterparty: counterparty.to_string(),
            purpose_pattern: None,
            operation_type,
            department: Department::LogisticsMsk,
            logistics_stage: Some(LogisticsStage::Mainline),
            direction: None,
        }
    }

    #[test]
    fn test_match_is_bidirectional_and_case_insensitive() {
        let rules = vec![rule("Деловые линии", OperationType::Cogs)];

        // transaction name contains the rule key
        assert!(match_rule("ТК Деловые линии", &rules).is_some());
        // rule key contains the transaction name
        assert!(match_rule("линии", &rules).is_some());
        // case-insensitive both ways
        assert!(match_rule("тк деловые ЛИНИИ", &rules).is_some());
        assert!(match_rule("Магистраль-Сервис", &rules).is_none());
    }

    #[test]
    fn test_first_match_wins_in_slice_order() {
        let rules = vec![
            rule("Транс", OperationType::Cogs),
            rule("ТрансКонтейнер", OperationType::Opex),
        ];
        // Both rules match; slice order decides.
        let matched = match_rule("ТрансКонтейнер", &rules).unwrap();
        assert_eq!(matched.operation_type, OperationType::Cogs);
    }

    #[test]
    fn test_fallback_classification() {
        let got = classify("ООО Ромашка", &[]);
        assert_eq!(got.operation_type, OperationType::Opex);
        assert_eq!(got.department, Department::General);
        assert_eq!(got.logistics_stage, None);
        assert_eq!(got.direction, None);
    }

    #[test]
    fn test_rule_classification_carries_all_fields() {
        let mut r = rule("Деловые линии", OperationType::Cogs);
        r.direction = Some(Direction::MskToKgd);
        let got = classify("ТК Деловые линии", &[r]);
        assert_eq!(got.operation_type, OperationType::Cogs);
        assert_eq!(got.department, Department::LogisticsMsk);
        assert_eq!(got.logistics_stage, Some(LogisticsStage::Mainline));
        assert_eq!(got.direction, Some(Direction::MskToKgd));
    }
}
