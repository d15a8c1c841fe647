//! Row-indexed containers passed between pipeline stages.
//!
//! Both containers keep their rows in insertion order and index them by
//! [`GridId`]. Row order is the contract that lets a classifier's output be
//! re-attached to the right cells, so nothing here ever sorts or dedups.

use std::collections::HashMap;

use crate::grid_id::GridId;

/// Numeric predictors for a set of grid cells.
///
/// Values are stored row-major; missing values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    index: Vec<GridId>,
    values: Vec<f64>,
}

impl FeatureMatrix {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            index: vec![],
            values: vec![],
        }
    }

    /// Appends one row.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have one value per column.
    pub fn push_row(&mut self, id: GridId, row: &[f64]) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row for cell {id} has {} values, expected {}",
            row.len(),
            self.columns.len()
        );
        self.index.push(id);
        self.values.extend_from_slice(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn index(&self) -> &[GridId] {
        &self.index
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let width = self.columns.len();
        &self.values[i * width..(i + 1) * width]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.n_rows()).map(|i| self.row(i))
    }
}

/// Label code for a row whose observed label is blank in the source data.
///
/// The row keeps its place in the index; the cell joins as low risk.
pub const MISSING_LABEL: i64 = i64::MIN;

/// One label code per grid cell.
///
/// Codes are `0` (low) and `1` (high) in well-formed data, or
/// [`MISSING_LABEL`]; other values are carried through unchanged and
/// classified later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelVector {
    index: Vec<GridId>,
    values: Vec<i64>,
}

impl LabelVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector from an index and values of equal length.
    ///
    /// Returns `None` if the lengths differ.
    #[must_use]
    pub fn from_parts(index: Vec<GridId>, values: Vec<i64>) -> Option<Self> {
        (index.len() == values.len()).then_some(Self { index, values })
    }

    pub fn push(&mut self, id: GridId, value: i64) {
        self.index.push(id);
        self.values.push(value);
    }

    #[must_use]
    pub fn index(&self) -> &[GridId] {
        &self.index
    }

    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&GridId, i64)> + '_ {
        self.index.iter().zip(self.values.iter().copied())
    }

    /// Lookup table from cell id to label. Later duplicates win.
    #[must_use]
    pub fn to_lookup(&self) -> HashMap<&GridId, i64> {
        self.iter().collect()
    }
}

impl<'a> FromIterator<(&'a str, i64)> for LabelVector {
    fn from_iter<T: IntoIterator<Item = (&'a str, i64)>>(iter: T) -> Self {
        let mut labels = Self::new();
        for (id, value) in iter {
            labels.push(GridId::new(id), value);
        }
        labels
    }
}
