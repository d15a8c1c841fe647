use chrono::{DateTime, Utc};
use firerisk_data::frame::FeatureMatrix;
use serde::{Deserialize, Serialize};

use crate::{BoxError, Classifier, ModelError, boosted::BoostedTrees, logistic::LogisticModel};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// A trained risk model as stored on disk.
///
/// ```json
/// {
///   "name": "xgb_v1",
///   "trained_at": "2025-06-01T00:00:00Z",
///   "threshold": 0.5,
///   "model": { "kind": "logistic", "bias": -2.0, "weights": { "N_FIRES": 0.7 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RiskModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Probabilities strictly above this are labeled high risk.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub model: ModelKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    Logistic(LogisticModel),
    BoostedTrees(BoostedTrees),
}

impl RiskModel {
    /// Structural checks that can be done without any input data.
    pub fn validate(&self) -> Result<(), ModelError> {
        match &self.model {
            ModelKind::Logistic(_) => Ok(()),
            ModelKind::BoostedTrees(trees) => trees.validate(),
        }
    }

    /// Names of the feature columns the model reads.
    #[must_use]
    pub fn feature_names(&self) -> Vec<&str> {
        match &self.model {
            ModelKind::Logistic(m) => m.weights.keys().map(String::as_str).collect(),
            ModelKind::BoostedTrees(m) => m.feature_names.iter().map(String::as_str).collect(),
        }
    }

    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        match &self.model {
            ModelKind::Logistic(m) => m.predict_proba(features),
            ModelKind::BoostedTrees(m) => m.predict_proba(features),
        }
    }
}

impl Classifier for RiskModel {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, BoxError> {
        let labels = self
            .predict_proba(features)?
            .into_iter()
            .map(|p| i64::from(p > self.threshold))
            .collect();
        Ok(labels)
    }
}
