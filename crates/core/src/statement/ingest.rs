//! Turns normalized statement rows into expense aggregates and operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::classify::{classify, ClassificationRule};
use crate::statement::parse::{detect_flow, parse_amount, parse_row_date, FlowKind};
use baltfin_shared::types::{Department, Direction, LogisticsStage, OperationType, Period};

/// Counterparty fallback for aggregated expenses without any usable name.
pub const NO_COUNTERPARTY: &str = "Без контрагента";

/// Counterparty fallback for recorded operations without any usable name.
pub const UNKNOWN_COUNTERPARTY: &str = "Не указан";

const PURPOSE_AS_NAME_LIMIT: usize = 100;

/// A bank statement row as uploaded by the client, already extracted from
/// the spreadsheet but with fields still in their raw textual form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedRow {
    /// Transaction date, DD.MM.YYYY / DD/MM/YYYY / ISO.
    #[serde(default)]
    pub date: String,
    /// Flow label ("Дебет", "Кредит", "приход", "расход", ...).
    #[serde(default, rename = "type")]
    pub type_label: String,
    /// Amount as exported, spaces and decimal commas included.
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: String,
    /// Payment purpose free text.
    #[serde(default)]
    pub purpose: String,
    /// Payer name, filled for inflows.
    #[serde(default)]
    pub payer: String,
    /// Recipient name, filled for outflows.
    #[serde(default)]
    pub recipient: String,
    /// Generic counterparty column, when the export has one.
    #[serde(default)]
    pub counterparty: String,
}

// Spreadsheet extractors send amounts as either JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// An outflow total for one counterparty within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyTotal {
    /// Resolved counterparty name.
    pub counterparty: String,
    /// Sum of absolute outflow amounts.
    pub total_amount: Decimal,
    /// Number of outflow rows.
    pub transaction_count: u32,
}

/// A fully classified operation ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperation {
    /// Transaction date.
    pub date: NaiveDate,
    /// Signed amount: negative for outflows, positive for inflows.
    pub amount: Decimal,
    /// Resolved counterparty name.
    pub counterparty: String,
    /// Payment purpose as uploaded.
    pub purpose: String,
    /// Classified operation type.
    pub operation_type: OperationType,
    /// Classified department.
    pub department: Department,
    /// Classified logistics stage.
    pub logistics_stage: Option<LogisticsStage>,
    /// Classified direction.
    pub direction: Option<Direction>,
}

/// Result of an operations ingestion pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// Operations built from usable rows, in upload order.
    pub operations: Vec<NewOperation>,
    /// Rows skipped for missing date or zero/unparseable amount.
    pub skipped: u32,
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

fn purpose_prefix(purpose: &str) -> Option<String> {
    let trimmed = purpose.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(PURPOSE_AS_NAME_LIMIT).collect())
}

/// Aggregates outflow rows into per-counterparty totals.
///
/// Only debit rows participate. The counterparty name is resolved in
/// order: recipient, the generic counterparty column, the first 100
/// characters of the purpose, then [`NO_COUNTERPARTY`]. Rows with a zero
/// or unparseable amount are dropped. The result is sorted by total
/// amount descending, biggest spend first.
#[must_use]
pub fn aggregate_expenses(rows: &[ParsedRow]) -> Vec<CounterpartyTotal> {
    let mut totals: BTreeMap<String, (Decimal, u32)> = BTreeMap::new();

    for row in rows {
        if detect_flow(&row.type_label) != Some(FlowKind::Debit) {
            continue;
        }
        let Some(amount) = parse_amount(&row.amount) else {
            continue;
        };
        if amount.is_zero() {
            continue;
        }
        let name = first_non_empty(&[&row.recipient, &row.counterparty])
            .map(str::to_string)
            .or_else(|| purpose_prefix(&row.purpose))
            .unwrap_or_else(|| NO_COUNTERPARTY.to_string());

        let entry = totals.entry(name).or_insert((Decimal::ZERO, 0));
        entry.0 += amount.abs();
        entry.1 += 1;
    }

    let mut out: Vec<CounterpartyTotal> = totals
        .into_iter()
        .map(|(counterparty, (total_amount, transaction_count))| CounterpartyTotal {
            counterparty,
            total_amount,
            transaction_count,
        })
        .collect();
    out.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    out
}

/// Builds classified operations from uploaded rows.
///
/// Both flows are recorded: outflows get a negative amount, everything
/// else a positive one. Rows with no parseable date or a zero amount are
/// counted as skipped. The counterparty is resolved flow-aware (payer
/// for inflows, recipient for outflows), then the generic counterparty
/// column, then the purpose prefix, then [`UNKNOWN_COUNTERPARTY`]; the
/// resolved name is what classification rules match against.
#[must_use]
pub fn build_operations(rows: &[ParsedRow], rules: &[ClassificationRule]) -> IngestOutcome {
    let mut operations = Vec::new();
    let mut skipped = 0u32;

    for row in rows {
        let (Some(date), Some(amount)) = (parse_row_date(&row.date), parse_amount(&row.amount))
        else {
            skipped += 1;
            continue;
        };
        if amount.is_zero() {
            skipped += 1;
            continue;
        }

        let flow = detect_flow(&row.type_label);
        let flow_name = match flow {
            Some(FlowKind::Credit) => row.payer.as_str(),
            Some(FlowKind::Debit) => row.recipient.as_str(),
            None => "",
        };
        let counterparty = first_non_empty(&[flow_name, &row.counterparty])
            .map(str::to_string)
            .or_else(|| purpose_prefix(&row.purpose))
            .unwrap_or_else(|| UNKNOWN_COUNTERPARTY.to_string());

        let signed = if flow == Some(FlowKind::Debit) {
            -amount.abs()
        } else {
            amount.abs()
        };
        let class = classify(&counterparty, rules);

        operations.push(NewOperation {
            date,
            amount: signed,
            counterparty,
            purpose: row.purpose.trim().to_string(),
            operation_type: class.operation_type,
            department: class.department,
            logistics_stage: class.logistics_stage,
            direction: class.direction,
        });
    }

    IngestOutcome {
        operations,
        skipped,
    }
}

/// The reporting period a batch of rows belongs to: the month of the
/// first row with a parseable date.
#[must_use]
pub fn batch_period(rows: &[ParsedRow]) -> Option<Period> {
    rows.iter()
        .find_map(|row| parse_row_date(&row.date))
        .map(Period::containing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn debit(recipient: &str, amount: &str) -> ParsedRow {
        ParsedRow {
            date: "05.03.2024".to_string(),
            type_label: "Дебет".to_string(),
            amount: amount.to_string(),
            recipient: recipient.to_string(),
            ..ParsedRow::default()
        }
    }

    fn credit(payer: &str, amount: &str) -> ParsedRow {
        ParsedRow {
            date: "07.03.2024".to_string(),
            type_label: "Кредит".to_string(),
            amount: amount.to_string(),
            payer: payer.to_string(),
            ..ParsedRow::default()
        }
    }

    fn cogs_rule(counterparty: &str) -> ClassificationRule {
        ClassificationRule {
            id: Uuid::new_v4(),
            counterparty: counterparty.to_string(),
            purpose_pattern: None,
            operation_type: OperationType::Cogs,
            department: Department::LogisticsMsk,
            logistics_stage: Some(LogisticsStage::Mainline),
            direction: Some(Direction::MskToKgd),
        }
    }

    #[test]
    fn test_aggregate_groups_debits_and_sorts_desc() {
        let rows = vec![
            debit("Деловые линии", "10 000,00"),
            debit("Деловые линии", "5 000"),
            debit("Аренда-Сервис", "40 000"),
            credit("Клиент", "99 999"),
        ];
        let totals = aggregate_expenses(&rows);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].counterparty, "Аренда-Сервис");
        assert_eq!(totals[0].total_amount, dec!(40000));
        assert_eq!(totals[0].transaction_count, 1);
        assert_eq!(totals[1].counterparty, "Деловые линии");
        assert_eq!(totals[1].total_amount, dec!(15000));
        assert_eq!(totals[1].transaction_count, 2);
    }

    #[test]
    fn test_aggregate_counterparty_fallback_chain() {
        let mut no_recipient = debit("", "1 000");
        no_recipient.counterparty = "ООО Ромашка".to_string();
        let mut purpose_only = debit("", "2 000");
        purpose_only.purpose = "Оплата по договору 42".to_string();
        let nothing = debit("", "3 000");

        let totals = aggregate_expenses(&[no_recipient, purpose_only, nothing]);
        let names: Vec<&str> = totals.iter().map(|t| t.counterparty.as_str()).collect();
        assert!(names.contains(&"ООО Ромашка"));
        assert!(names.contains(&"Оплата по договору 42"));
        assert!(names.contains(&NO_COUNTERPARTY));
    }

    #[test]
    fn test_aggregate_uses_absolute_amounts() {
        let totals = aggregate_expenses(&[debit("Аренда", "-7 500,25")]);
        assert_eq!(totals[0].total_amount, dec!(7500.25));
    }

    #[test]
    fn test_build_operations_signs_and_classifies() {
        let rules = vec![cogs_rule("Деловые линии")];
        let rows = vec![
            debit("ТК Деловые линии", "12 000"),
            credit("Клиент Иванов", "30 000"),
        ];
        let outcome = build_operations(&rows, &rules);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.operations.len(), 2);

        let expense = &outcome.operations[0];
        assert_eq!(expense.amount, dec!(-12000));
        assert_eq!(expense.operation_type, OperationType::Cogs);
        assert_eq!(expense.logistics_stage, Some(LogisticsStage::Mainline));
        assert_eq!(expense.direction, Some(Direction::MskToKgd));

        let income = &outcome.operations[1];
        assert_eq!(income.amount, dec!(30000));
        assert_eq!(income.counterparty, "Клиент Иванов");
        // no rule matches, so the fallback applies
        assert_eq!(income.operation_type, OperationType::Opex);
        assert_eq!(income.department, Department::General);
    }

    #[test]
    fn test_build_operations_skips_unusable_rows() {
        let mut bad_date = debit("Аренда", "1 000");
        bad_date.date = "вчера".to_string();
        let zero = debit("Аренда", "0");
        let mut bad_amount = debit("Аренда", "1 000");
        bad_amount.amount = "н/д".to_string();

        let outcome = build_operations(&[bad_date, zero, bad_amount], &[]);
        assert!(outcome.operations.is_empty());
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn test_build_operations_unlabeled_flow_is_an_inflow() {
        let row = ParsedRow {
            date: "01.03.2024".to_string(),
            type_label: "перевод".to_string(),
            amount: "500".to_string(),
            counterparty: "ООО Ромашка".to_string(),
            ..ParsedRow::default()
        };
        let outcome = build_operations(&[row], &[]);
        assert_eq!(outcome.operations[0].amount, dec!(500));
    }

    #[test]
    fn test_build_operations_unknown_counterparty_fallback() {
        let row = ParsedRow {
            date: "01.03.2024".to_string(),
            type_label: "Дебет".to_string(),
            amount: "500".to_string(),
            ..ParsedRow::default()
        };
        let outcome = build_operations(&[row], &[]);
        assert_eq!(outcome.operations[0].counterparty, UNKNOWN_COUNTERPARTY);
    }

    #[test]
    fn test_batch_period_from_first_dated_row() {
        let mut undated = debit("Аренда", "1");
        undated.date = String::new();
        let rows = vec![undated, debit("Аренда", "2")];
        let period = batch_period(&rows).unwrap();
        assert_eq!(period.label(), "2024-03");
    }

    #[test]
    fn test_parsed_row_amount_accepts_json_numbers() {
        let row: ParsedRow =
            serde_json::from_str(r#"{"date":"01.03.2024","type":"Дебет","amount":1500.5}"#)
                .unwrap();
        assert_eq!(parse_amount(&row.amount), Some(dec!(1500.5)));
    }
}
