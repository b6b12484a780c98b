//! Month-level period key.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reporting period: a calendar month, keyed by its first day.
///
/// Manual entries, statement aggregates, sales, and opening balances are
/// all stored against a `Period`. Construction normalizes any date to the
/// first of its month, so two periods compare equal iff they are the same
/// calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(NaiveDate);

impl Period {
    /// Creates a period from a year and 1-based month number.
    #[must_use]
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Creates a period containing the given date.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        // from_ymd_opt with day 1 of an existing date's month cannot fail
        Self(
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .unwrap_or(date),
        )
    }

    /// First day of the month.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.0
    }

    /// Last day of the month.
    #[must_use]
    pub fn end(self) -> NaiveDate {
        self.next().start() - Days::new(1)
    }

    /// The following month.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + Months::new(1))
    }

    /// The period `months` months earlier.
    #[must_use]
    pub fn months_back(self, months: u32) -> Self {
        Self(self.0 - Months::new(months))
    }

    /// `YYYY-MM` label used for chart axes.
    #[must_use]
    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Self::containing(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containing_normalizes_to_first_of_month() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let p = Period::containing(d);
        assert_eq!(p.start(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(p, Period::from_ym(2024, 3).unwrap());
    }

    #[test]
    fn test_end_handles_month_lengths() {
        assert_eq!(
            Period::from_ym(2024, 2).unwrap().end(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            Period::from_ym(2023, 12).unwrap().end(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_next_crosses_year_boundary() {
        let p = Period::from_ym(2023, 12).unwrap();
        assert_eq!(p.next(), Period::from_ym(2024, 1).unwrap());
    }

    #[test]
    fn test_months_back() {
        let p = Period::from_ym(2024, 2).unwrap();
        assert_eq!(p.months_back(11), Period::from_ym(2023, 3).unwrap());
    }

    #[test]
    fn test_label_format() {
        assert_eq!(Period::from_ym(2024, 7).unwrap().label(), "2024-07");
        assert_eq!(Period::from_ym(999, 12).unwrap().label(), "0999-12");
    }
}
