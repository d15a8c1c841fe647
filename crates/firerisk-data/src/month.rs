use std::{fmt, str::FromStr};

use chrono::{Datelike as _, NaiveDate};

/// Returned when a month string is not a zero-padded `YYYY-MM` value.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("malformed month {input:?}: expected zero-padded YYYY-MM")]
pub struct MalformedMonthError {
    pub input: String,
}

/// A calendar month, identified by year and month number.
///
/// Parsing is strict: only the zero-padded `YYYY-MM` form is accepted, so
/// `"2025-05"` parses while `"2025-5"` and `"2025/05"` are rejected.
///
/// ```
/// # use firerisk_data::month::YearMonth;
/// let month: YearMonth = "2025-05".parse().unwrap();
/// assert_eq!(month.to_string(), "2025-05");
/// assert_eq!(month.readable(), "May 2025");
/// assert!("2025-5".parse::<YearMonth>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    /// Whether `date` falls inside this month. Day is ignored.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human-readable form, e.g. `"May 2025"`.
    #[must_use]
    pub fn readable(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    fn first_day(self) -> NaiveDate {
        // `new` and `from_date` only build months that have a first day
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

impl FromStr for YearMonth {
    type Err = MalformedMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MalformedMonthError {
            input: s.to_owned(),
        };

        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(err());
        }

        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zero_padded() {
        let month: YearMonth = "2025-05".parse().unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 5);
    }

    #[test]
    fn test_reject_non_padded_month() {
        let err = "2025-5".parse::<YearMonth>().unwrap_err();
        assert_eq!(err.input, "2025-5");
    }

    #[test]
    fn test_reject_malformed() {
        for input in ["", "2025", "2025-13", "2025-00", "25-05", "2025/05", "2025-05-01", "abcd-ef", " 2025-05"] {
            assert!(input.parse::<YearMonth>().is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_contains_ignores_day() {
        let month: YearMonth = "2025-05".parse().unwrap();
        assert!(month.contains(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()));
        assert!(month.contains(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()));
    }

    #[test]
    fn test_readable() {
        let month: YearMonth = "2024-12".parse().unwrap();
        assert_eq!(month.readable(), "December 2024");
    }
}
