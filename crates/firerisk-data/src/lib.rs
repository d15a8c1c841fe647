//! Data layer of the wildfire-risk map pipeline.
//!
//! This crate owns the tabular and spatial inputs and the two pure
//! transformations that operate on them:
//!
//! 1. **History** ([`history::HistoryTable`]): one row per (grid cell, month-end)
//!    pair, loaded from CSV.
//! 2. **Month slicing** ([`slice::slice`]): selects one outcome month and splits it
//!    into a [`frame::FeatureMatrix`] and an observed [`frame::LabelVector`].
//! 3. **Grid** ([`grid::GridGeometry`]): the fixed spatial partition, loaded from
//!    GeoJSON and never mutated.
//! 4. **Grid join** ([`risk::annotate`]): maps label codes to
//!    [`risk::RiskLevel`]s and left-joins them onto the grid, defaulting
//!    unlabeled cells to low risk.
//!
//! Predictions are produced elsewhere (`firerisk-model`); from this crate's
//! point of view a predicted label vector is indistinguishable from an
//! observed one.

pub mod frame;
pub mod grid;
pub mod grid_id;
pub mod history;
pub mod month;
pub mod risk;
pub mod slice;
