//! Field-level parsers for bank statement rows.
//!
//! Banks export amounts with spaces for thousands and either `,` or `.`
//! as the decimal separator, and dates as DD.MM.YYYY; the parsers here
//! absorb that so the rest of the pipeline only sees `Decimal`/`NaiveDate`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Whether a statement row is an inflow or an outflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// Inflow ("кредит" / "приход").
    Credit,
    /// Outflow ("дебет" / "расход").
    Debit,
}

/// Detects the flow kind from the row's free-text type label.
///
/// Case-insensitive substring match on the Russian bank tokens. Returns
/// `None` when the label matches neither; callers decide what that means
/// (the operation recorder treats non-debit rows as inflows, the expense
/// aggregator skips them).
#[must_use]
pub fn detect_flow(type_label: &str) -> Option<FlowKind> {
    let label = type_label.trim().to_lowercase();
    if label.contains("дебет") || label.contains("расход") {
        Some(FlowKind::Debit)
    } else if label.contains("кредит") || label.contains("приход") {
        Some(FlowKind::Credit)
    } else {
        None
    }
}

/// Parses a statement amount.
///
/// Tolerates spaces (including non-breaking) as thousands separators and
/// both `,` and `.` as decimal separators. A comma followed by one to
/// three digits at the end of the string is a decimal separator; any
/// other comma is a thousands separator and is dropped.
///
/// Returns `None` for empty or unparseable input; rows with no usable
/// amount are skipped upstream, never reported as errors.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return None;
    }

    // Trailing ",digits" (1-3 of them) is a decimal comma.
    if let Some(pos) = s.rfind(',') {
        let tail = &s[pos + 1..];
        if (1..=3).contains(&tail.len()) && tail.bytes().all(|b| b.is_ascii_digit()) {
            s.replace_range(pos..=pos, ".");
        }
    }
    // Everything left over is grouping noise.
    s.retain(|c| c != ',');

    Decimal::from_str(&s).ok()
}

/// Parses a statement date: DD.MM.YYYY, DD/MM/YYYY, or ISO YYYY-MM-DD.
#[must_use]
pub fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for format in ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("Дебет", Some(FlowKind::Debit))]
    #[case("расход", Some(FlowKind::Debit))]
    #[case("Тип: ДЕБЕТ", Some(FlowKind::Debit))]
    #[case("Кредит", Some(FlowKind::Credit))]
    #[case("приход", Some(FlowKind::Credit))]
    #[case("перевод", None)]
    #[case("", None)]
    fn test_detect_flow(#[case] label: &str, #[case] expected: Option<FlowKind>) {
        assert_eq!(detect_flow(label), expected);
    }

    #[rstest]
    #[case("45000", dec!(45000))]
    #[case("45 000,50", dec!(45000.50))]
    #[case("1 234 567.89", dec!(1234567.89))]
    // the trailing comma group is a decimal tail, earlier ones are dropped
    #[case("1,234,567", dec!(1234.567))]
    #[case("1,234,567,89", dec!(1234567.89))]
    #[case("-12 500,1", dec!(-12500.1))]
    #[case("0,125", dec!(0.125))]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw), Some(expected));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("итого"), None);
        // Four digits after the comma is not a decimal tail.
        assert_eq!(parse_amount("1,2345"), Some(dec!(12345)));
    }

    #[test]
    fn test_parse_row_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_row_date("05.03.2024"), Some(expected));
        assert_eq!(parse_row_date("5/3/2024"), Some(expected));
        assert_eq!(parse_row_date("2024-03-05"), Some(expected));
        assert_eq!(parse_row_date("03-05-2024"), None);
        assert_eq!(parse_row_date(""), None);
    }
}
