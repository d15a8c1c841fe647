//! Joining label vectors onto the grid.

use std::{collections::HashMap, fmt};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    frame::{LabelVector, MISSING_LABEL},
    grid::{GridCell, GridGeometry},
    grid_id::GridId,
    history::{GRID_ID, RISK_NEXT_MONTH},
};

/// Label code written back for [`RiskLevel::Unknown`] by
/// [`RiskAnnotatedGrid::to_labels`].
pub const UNKNOWN_LABEL: i64 = -1;

/// Categorical risk of a grid cell for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
    /// The label code was neither `0` nor `1`.
    Unknown,
}

impl RiskLevel {
    /// Maps a label code to a risk level: `0` and [`MISSING_LABEL`] are low,
    /// `1` is high, and every other code is unknown.
    #[must_use]
    pub fn from_label(label: i64) -> Self {
        match label {
            0 | MISSING_LABEL => Self::Low,
            1 => Self::High,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn to_label(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::High => 1,
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grid cell paired with its risk level.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskCell<'a> {
    pub cell: &'a GridCell,
    pub risk: RiskLevel,
}

impl RiskCell<'_> {
    #[must_use]
    pub fn id(&self) -> &GridId {
        &self.cell.id
    }

    #[must_use]
    pub fn geometry(&self) -> &Value {
        &self.cell.geometry
    }

    /// Source properties with `GRID_ID` and `RISK_NEXT_MONTH` set explicitly.
    #[must_use]
    pub fn properties(&self) -> Map<String, Value> {
        let mut properties = self.cell.properties.clone();
        properties.insert(GRID_ID.to_owned(), Value::String(self.cell.id.to_string()));
        properties.insert(
            RISK_NEXT_MONTH.to_owned(),
            Value::String(self.risk.as_str().to_owned()),
        );
        properties
    }
}

/// Per-level cell counts of an annotated grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub low: usize,
    pub high: usize,
    pub unknown: usize,
}

/// The grid with one risk level per cell, in grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAnnotatedGrid<'a> {
    cells: Vec<RiskCell<'a>>,
}

impl<'a> RiskAnnotatedGrid<'a> {
    #[must_use]
    pub fn cells(&self) -> &[RiskCell<'a>] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Re-extracts a label vector covering every cell of the grid.
    #[must_use]
    pub fn to_labels(&self) -> LabelVector {
        let mut labels = LabelVector::new();
        for cell in &self.cells {
            labels.push(cell.id().clone(), cell.risk.to_label());
        }
        labels
    }

    #[must_use]
    pub fn counts(&self) -> RiskCounts {
        let mut counts = RiskCounts::default();
        for cell in &self.cells {
            match cell.risk {
                RiskLevel::Low => counts.low += 1,
                RiskLevel::High => counts.high += 1,
                RiskLevel::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

/// Annotates every grid cell with the risk level of its label.
///
/// The grid drives the join: each cell appears exactly once, in grid order.
/// Cells without a label default to [`RiskLevel::Low`]. If `labels` names a
/// cell more than once, the last value wins.
///
/// ```
/// # use firerisk_data::{grid::{GridCell, GridGeometry}, grid_id::GridId, frame::LabelVector, risk::{annotate, RiskLevel}};
/// let cell = |id: &str| GridCell { id: GridId::new(id), geometry: Default::default(), properties: Default::default() };
/// let grid = GridGeometry::new(vec![cell("G1"), cell("G2")]);
/// let labels: LabelVector = [("G1", 1)].into_iter().collect();
///
/// let risk = annotate(&labels, &grid);
/// assert_eq!(risk.cells()[0].risk, RiskLevel::High);
/// assert_eq!(risk.cells()[1].risk, RiskLevel::Low);
/// ```
#[must_use]
pub fn annotate<'a>(labels: &LabelVector, grid: &'a GridGeometry) -> RiskAnnotatedGrid<'a> {
    let lookup = labels.to_lookup();
    let cells: Vec<_> = grid
        .cells()
        .iter()
        .map(|cell| RiskCell {
            cell,
            risk: lookup
                .get(&cell.id)
                .map_or(RiskLevel::Low, |&label| RiskLevel::from_label(label)),
        })
        .collect();
    let annotated = RiskAnnotatedGrid { cells };

    let counts = annotated.counts();
    if counts.unknown > 0 {
        warn!(cells = counts.unknown, "labels outside {{0, 1}} mapped to unknown risk");
    }
    debug!(
        low = counts.low,
        high = counts.high,
        unlabeled = grid.len().saturating_sub(matched(&lookup, grid)),
        "annotated grid"
    );
    annotated
}

fn matched(lookup: &HashMap<&GridId, i64>, grid: &GridGeometry) -> usize {
    grid.cells()
        .iter()
        .filter(|c| lookup.contains_key(&c.id))
        .count()
}
