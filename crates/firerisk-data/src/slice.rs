use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    frame::{FeatureMatrix, LabelVector, MISSING_LABEL},
    history::HistoryTable,
    month::{MalformedMonthError, YearMonth},
};

/// Extracts the features and observed labels for one outcome month.
///
/// `month` must be a zero-padded `YYYY-MM` string. A month with no matching
/// records is not an error: both returned containers are simply empty.
///
/// ```
/// # use firerisk_data::{history::HistoryTable, slice::slice};
/// let csv = "GRID_ID,CURRENT_MONTH_END,NEXT_MONTH_END,N_FIRES,RISK_NEXT_MONTH\n\
///            G1,2025-04-30,2025-05-15,2,1\n";
/// let history = HistoryTable::from_reader(csv.as_bytes()).unwrap();
///
/// let (features, labels) = slice(&history, "2025-05").unwrap();
/// assert_eq!(features.n_rows(), 1);
/// assert_eq!(labels.values(), [1]);
///
/// assert!(slice(&history, "2025-5").is_err());
/// ```
pub fn slice(
    history: &HistoryTable,
    month: &str,
) -> Result<(FeatureMatrix, LabelVector), MalformedMonthError> {
    let month = month.parse()?;
    Ok(slice_month(history, month))
}

/// Same as [`slice`] for an already-parsed month.
#[must_use]
pub fn slice_month(history: &HistoryTable, month: YearMonth) -> (FeatureMatrix, LabelVector) {
    let mut features = FeatureMatrix::new(history.feature_names().to_vec());
    let mut labels = LabelVector::new();

    for record in history
        .records()
        .iter()
        .filter(|r| month.contains(r.next_month_end))
    {
        features.push_row(record.grid_id.clone(), &record.features);
        labels.push(
            record.grid_id.clone(),
            record.label.unwrap_or(MISSING_LABEL),
        );
    }

    let distinct: HashSet<_> = labels.index().iter().collect();
    if distinct.len() != labels.len() {
        warn!(
            %month,
            duplicates = labels.len() - distinct.len(),
            "history has duplicate grid cells for month"
        );
    }

    debug!(%month, rows = features.n_rows(), "sliced history");
    (features, labels)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{grid_id::GridId, history::HistoricalRecord};

    fn record(id: &str, next: (i32, u32, u32), features: [f64; 2], label: i64) -> HistoricalRecord {
        let next_month_end = NaiveDate::from_ymd_opt(next.0, next.1, next.2).unwrap();
        HistoricalRecord {
            grid_id: GridId::new(id),
            current_month_end: next_month_end - chrono::Months::new(1),
            next_month_end,
            features: features.to_vec(),
            label: Some(label),
        }
    }

    fn history() -> HistoryTable {
        HistoryTable::new(
            vec!["A".into(), "B".into()],
            vec![
                record("G1", (2025, 5, 15), [1.0, 2.0], 1),
                record("G2", (2025, 4, 30), [3.0, 4.0], 0),
                record("G3", (2025, 5, 31), [5.0, 6.0], 0),
                record("G4", (2024, 5, 31), [7.0, 8.0], 1),
            ],
        )
    }

    #[test]
    fn test_single_record_month() {
        let history = HistoryTable::new(
            vec!["A".into(), "B".into()],
            vec![record("G1", (2025, 5, 15), [1.0, 2.0], 1)],
        );
        let (features, labels) = slice(&history, "2025-05").unwrap();

        assert_eq!(features.index(), [GridId::new("G1")]);
        assert_eq!(features.row(0), &[1.0, 2.0]);
        assert_eq!(labels.index(), [GridId::new("G1")]);
        assert_eq!(labels.values(), [1]);
    }

    #[test]
    fn test_matches_year_and_month_only() {
        let (features, labels) = slice(&history(), "2025-05").unwrap();
        assert_eq!(features.index(), [GridId::new("G1"), GridId::new("G3")]);
        assert_eq!(labels.values(), [1, 0]);
        assert_eq!(features.columns(), ["A", "B"]);
    }

    #[test]
    fn test_empty_month() {
        let (features, labels) = slice(&history(), "2023-01").unwrap();
        assert!(features.is_empty());
        assert!(labels.is_empty());
        assert_eq!(features.columns().len(), 2);
    }

    #[test]
    fn test_malformed_month() {
        let err = slice(&history(), "2025-5").unwrap_err();
        assert_eq!(err.input, "2025-5");
    }

    #[test]
    fn test_blank_label_keeps_row() {
        let mut blank = record("G2", (2025, 5, 31), [3.0, 4.0], 0);
        blank.label = None;
        let history = HistoryTable::new(
            vec!["A".into(), "B".into()],
            vec![record("G1", (2025, 5, 15), [1.0, 2.0], 1), blank],
        );
        let (features, labels) = slice(&history, "2025-05").unwrap();
        assert_eq!(features.n_rows(), 2);
        assert_eq!(labels.index(), features.index());
        assert_eq!(labels.values(), [1, MISSING_LABEL]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let history = HistoryTable::new(
            vec!["A".into(), "B".into()],
            vec![
                record("G1", (2025, 5, 15), [1.0, 2.0], 1),
                record("G1", (2025, 5, 31), [1.0, 2.0], 0),
            ],
        );
        let (features, labels) = slice(&history, "2025-05").unwrap();
        assert_eq!(features.n_rows(), 2);
        assert_eq!(labels.values(), [1, 0]);
    }
}
