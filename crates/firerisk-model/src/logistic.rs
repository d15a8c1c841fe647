use std::{collections::BTreeMap, iter};

use firerisk_data::frame::FeatureMatrix;
use serde::{Deserialize, Serialize};

use crate::{ModelError, bind_columns, sigmoid};

/// Logistic regression over named features.
///
/// Missing (`NaN`) inputs contribute nothing to the margin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogisticModel {
    #[serde(default)]
    pub bias: f64,
    pub weights: BTreeMap<String, f64>,
}

impl LogisticModel {
    /// Probability of high risk for every row of `features`.
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        let columns = bind_columns(self.weights.keys(), features)?;
        let proba = features
            .rows()
            .map(|row| {
                let margin = iter::zip(&columns, self.weights.values())
                    .map(|(&col, w)| (row[col], w))
                    .filter(|(x, _)| !x.is_nan())
                    .map(|(x, w)| x * w)
                    .sum::<f64>();
                sigmoid(self.bias + margin)
            })
            .collect();
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use firerisk_data::grid_id::GridId;

    use super::*;

    fn model() -> LogisticModel {
        LogisticModel {
            bias: -1.0,
            weights: BTreeMap::from([("FIRES".to_owned(), 2.0), ("TEMP".to_owned(), 0.5)]),
        }
    }

    #[test]
    fn test_binds_by_name() {
        let mut features = FeatureMatrix::new(vec!["TEMP".into(), "EXTRA".into(), "FIRES".into()]);
        features.push_row(GridId::new("1"), &[2.0, 100.0, 0.0]);
        features.push_row(GridId::new("2"), &[0.0, 100.0, 0.5]);

        let proba = model().predict_proba(&features).unwrap();
        // margins: -1 + 0.5*2 = 0, -1 + 2*0.5 = 0
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert!((proba[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_nan_contributes_nothing() {
        let mut features = FeatureMatrix::new(vec!["FIRES".into(), "TEMP".into()]);
        features.push_row(GridId::new("1"), &[f64::NAN, 2.0]);
        let proba = model().predict_proba(&features).unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_feature() {
        let features = FeatureMatrix::new(vec!["FIRES".into()]);
        let err = model().predict_proba(&features).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingFeature {
                name: "TEMP".to_owned()
            }
        );
    }
}
