use std::error::Error;

use firerisk_data::frame::{FeatureMatrix, LabelVector};
use tracing::debug;

use crate::{BoxError, Classifier, ModelError};

/// A classifier invocation failed. The underlying cause is kept unmodified.
#[derive(Debug, derive_more::Display)]
#[display("model prediction failed")]
pub struct PredictionError {
    source: BoxError,
}

impl PredictionError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            source: source.into(),
        }
    }

    #[must_use]
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.source
    }
}

impl Error for PredictionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}

/// Predicts labels for `features`, indexed like `true_labels`.
///
/// `true_labels` only supplies the index: the returned vector has the same
/// cells in the same order, with the values replaced by the model's
/// predictions. An empty matrix short-circuits to an empty vector without
/// calling the model.
pub fn predict<C>(
    features: &FeatureMatrix,
    true_labels: &LabelVector,
    model: &C,
) -> Result<LabelVector, PredictionError>
where
    C: Classifier + ?Sized,
{
    if features.is_empty() {
        return Ok(LabelVector::new());
    }
    if features.n_rows() != true_labels.len() {
        return Err(PredictionError::new(ModelError::RowCountMismatch {
            features: features.n_rows(),
            labels: true_labels.len(),
        }));
    }

    let predictions = model.predict(features).map_err(PredictionError::new)?;
    let actual = predictions.len();
    let predicted = LabelVector::from_parts(true_labels.index().to_vec(), predictions).ok_or_else(
        || {
            PredictionError::new(ModelError::PredictionCountMismatch {
                expected: true_labels.len(),
                actual,
            })
        },
    )?;

    debug!(
        rows = predicted.len(),
        high = predicted.values().iter().filter(|&&v| v == 1).count(),
        "predicted labels"
    );
    Ok(predicted)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use firerisk_data::grid_id::GridId;

    use super::*;

    /// Labels a row high when its first feature is positive.
    #[derive(Debug, Default)]
    struct SignModel {
        calls: AtomicUsize,
    }

    impl Classifier for SignModel {
        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if features.is_empty() {
                return Err("empty input".into());
            }
            Ok(features.rows().map(|r| i64::from(r[0] > 0.0)).collect())
        }
    }

    #[derive(Debug)]
    struct ShortModel;

    impl Classifier for ShortModel {
        fn predict(&self, _features: &FeatureMatrix) -> Result<Vec<i64>, BoxError> {
            Ok(vec![1])
        }
    }

    fn inputs(rows: &[(&str, f64, i64)]) -> (FeatureMatrix, LabelVector) {
        let mut features = FeatureMatrix::new(vec!["X".into()]);
        let mut labels = LabelVector::new();
        for &(id, x, y) in rows {
            features.push_row(GridId::new(id), &[x]);
            labels.push(GridId::new(id), y);
        }
        (features, labels)
    }

    #[test]
    fn test_preserves_index() {
        let (features, labels) = inputs(&[("c", 1.0, 0), ("a", -1.0, 1), ("b", 2.0, 0)]);
        let model = SignModel::default();
        let predicted = predict(&features, &labels, &model).unwrap();

        assert_eq!(predicted.index(), labels.index());
        assert_eq!(predicted.values(), [1, 0, 1]);
        assert_eq!(labels.values(), [0, 1, 0]);
    }

    #[test]
    fn test_empty_features_skip_model() {
        let (features, labels) = inputs(&[]);
        let model = SignModel::default();
        let predicted = predict(&features, &labels, &model).unwrap();

        assert!(predicted.is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_failure_is_wrapped() {
        let (features, labels) = inputs(&[("a", 1.0, 0), ("b", 1.0, 0)]);
        let err = predict(&features, &labels, &ShortModel).unwrap_err();
        assert_eq!(
            err.cause().downcast_ref::<ModelError>(),
            Some(&ModelError::PredictionCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_row_count_mismatch() {
        let (features, _) = inputs(&[("a", 1.0, 0)]);
        let (_, labels) = inputs(&[("a", 1.0, 0), ("b", 1.0, 0)]);
        let err = predict(&features, &labels, &SignModel::default()).unwrap_err();
        assert!(matches!(
            err.cause().downcast_ref::<ModelError>(),
            Some(ModelError::RowCountMismatch { features: 1, labels: 2 })
        ));
    }

    #[test]
    fn test_dyn_classifier() {
        let (features, labels) = inputs(&[("a", 1.0, 0)]);
        let model: Box<dyn Classifier> = Box::new(SignModel::default());
        let predicted = predict(&features, &labels, model.as_ref()).unwrap();
        assert_eq!(predicted.values(), [1]);
    }
}
