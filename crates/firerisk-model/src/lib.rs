//! Risk classifiers and the prediction step of the map pipeline.
//!
//! The pipeline only needs one capability from a model: turn a
//! [`FeatureMatrix`] into one label code per row, in row order. That
//! capability is the [`Classifier`] trait. [`predictor::predict`] wraps a
//! classifier call so that its output is re-attached to the grid-cell index
//! of the observed labels.
//!
//! # Model artifacts
//!
//! Trained models are shipped as JSON ([`artifact::RiskModel`]) and come in
//! two kinds:
//!
//! - [`logistic::LogisticModel`]: `p = σ(b + Σ wᵢ·xᵢ)` over named features
//! - [`boosted::BoostedTrees`]: `p = σ(base + Σ leafₜ(x))`, a gradient-boosted
//!   tree ensemble with per-split missing-value routing
//!
//! A row is labeled high risk (`1`) when `p > threshold`, low (`0`) otherwise.
//!
//! Models bind their inputs to feature-matrix columns by name, so column order
//! in the history file does not matter, but every feature the model was
//! trained on must be present.

use std::fmt;

use firerisk_data::frame::FeatureMatrix;

pub mod artifact;
pub mod boosted;
pub mod logistic;
pub mod predictor;

/// Type-erased error returned by [`Classifier`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Batch-predicts label codes from a feature matrix.
///
/// Implementations must return exactly one label per row of `features`, in
/// row order. They may reject empty input; [`predictor::predict`] never calls
/// them with an empty matrix.
pub trait Classifier: fmt::Debug + Send + Sync {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, BoxError>;
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display("model feature '{name}' is not a column of the feature matrix")]
    MissingFeature { name: String },
    #[display("feature matrix has {features} rows but the label index has {labels}")]
    RowCountMismatch { features: usize, labels: usize },
    #[display("model returned {actual} predictions for {expected} rows")]
    PredictionCountMismatch { expected: usize, actual: usize },
    #[display("tree #{tree} is malformed at node #{node}")]
    InvalidTree { tree: usize, node: usize },
}

/// Resolves model feature names to column positions in `features`.
pub(crate) fn bind_columns<'a, I>(names: I, features: &FeatureMatrix) -> Result<Vec<usize>, ModelError>
where
    I: IntoIterator<Item = &'a String>,
{
    names
        .into_iter()
        .map(|name| {
            features
                .column_position(name)
                .ok_or_else(|| ModelError::MissingFeature { name: name.clone() })
        })
        .collect()
}

pub(crate) fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}
