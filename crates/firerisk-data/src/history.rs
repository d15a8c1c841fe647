//! Historical fire-risk records loaded from CSV.
//!
//! The table has one row per (grid cell, month-end) pair. Four columns are
//! reserved ([`GRID_ID`], [`CURRENT_MONTH_END`], [`NEXT_MONTH_END`],
//! [`RISK_NEXT_MONTH`]); every other column is a numeric feature, kept in
//! header order.

use std::{collections::BTreeMap, io};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::{grid_id::GridId, month::YearMonth};

pub const GRID_ID: &str = "GRID_ID";
pub const CURRENT_MONTH_END: &str = "CURRENT_MONTH_END";
pub const NEXT_MONTH_END: &str = "NEXT_MONTH_END";
pub const RISK_NEXT_MONTH: &str = "RISK_NEXT_MONTH";

const RESERVED_COLUMNS: [&str; 4] = [GRID_ID, CURRENT_MONTH_END, NEXT_MONTH_END, RISK_NEXT_MONTH];

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum HistoryLoadError {
    #[display("failed to read history CSV")]
    #[from]
    Csv(csv::Error),
    #[display("history CSV is missing required column '{column}'")]
    MissingColumn {
        column: &'static str,
    },
    #[display("line {line}: column '{column}' has invalid value {value:?}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}

/// One row of the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub grid_id: GridId,
    pub current_month_end: NaiveDate,
    pub next_month_end: NaiveDate,
    /// Feature values in the table's feature-column order.
    pub features: Vec<f64>,
    /// Observed risk label for the next month; `None` when the field is blank.
    pub label: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    feature_names: Vec<String>,
    records: Vec<HistoricalRecord>,
}

impl HistoryTable {
    /// Builds a table from already-parsed records.
    ///
    /// # Panics
    ///
    /// Panics if a record's feature count differs from `feature_names`.
    #[must_use]
    pub fn new(feature_names: Vec<String>, records: Vec<HistoricalRecord>) -> Self {
        for record in &records {
            assert_eq!(
                record.features.len(),
                feature_names.len(),
                "record for cell {} has mismatched feature count",
                record.grid_id
            );
        }
        Self {
            feature_names,
            records,
        }
    }

    /// Parses a history table from CSV text with a header row.
    pub fn from_reader<R>(reader: R) -> Result<Self, HistoryLoadError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();

        let position = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(HistoryLoadError::MissingColumn { column })
        };
        let id_col = position(GRID_ID)?;
        let current_col = position(CURRENT_MONTH_END)?;
        let next_col = position(NEXT_MONTH_END)?;
        let label_col = position(RISK_NEXT_MONTH)?;

        let feature_cols: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !RESERVED_COLUMNS.contains(h))
            .map(|(i, _)| i)
            .collect();
        let feature_names = feature_cols.iter().map(|&i| headers[i].to_owned()).collect();

        let mut records = vec![];
        for row in reader.records() {
            let row = row?;
            let line = row.position().map_or(0, csv::Position::line);
            let field = |i: usize| row.get(i).unwrap_or_default();
            let invalid = |i: usize| HistoryLoadError::InvalidValue {
                line,
                column: headers[i].to_owned(),
                value: field(i).to_owned(),
            };

            let features = feature_cols
                .iter()
                .map(|&i| parse_feature(field(i)).ok_or_else(|| invalid(i)))
                .collect::<Result<_, _>>()?;

            records.push(HistoricalRecord {
                grid_id: GridId::new(field(id_col)),
                current_month_end: parse_date(field(current_col)).ok_or_else(|| invalid(current_col))?,
                next_month_end: parse_date(field(next_col)).ok_or_else(|| invalid(next_col))?,
                features,
                label: parse_label(field(label_col)).ok_or_else(|| invalid(label_col))?,
            });
        }

        debug!(
            records = records.len(),
            features = feature_cols.len(),
            "parsed history table"
        );
        Ok(Self {
            feature_names,
            records,
        })
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per outcome month (by next-month-end), ascending.
    #[must_use]
    pub fn month_counts(&self) -> BTreeMap<YearMonth, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts
                .entry(YearMonth::from_date(record.next_month_end))
                .or_default() += 1;
        }
        counts
    }
}

/// Calendar date of a date or datetime field. An offset, if any, is ignored:
/// the date is taken as written.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some(dt) = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_feature(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(f64::NAN);
    }
    match s {
        "True" | "true" => Some(1.0),
        "False" | "false" => Some(0.0),
        _ => s.parse().ok(),
    }
}

/// Outer `None` is a parse failure; inner `None` a blank field.
#[expect(clippy::cast_possible_truncation)]
fn parse_label(s: &str) -> Option<Option<i64>> {
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    if let Ok(n) = s.parse() {
        return Some(Some(n));
    }
    let f: f64 = s.parse().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(Some(f as i64))
}
