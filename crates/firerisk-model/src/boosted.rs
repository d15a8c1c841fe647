//! Gradient-boosted regression trees with a logistic link.
//!
//! Trees are stored as flat node arrays in the layout produced by common
//! boosting libraries' JSON dumps: node `0` is the root and every child index
//! is greater than its parent's, which guarantees that traversal terminates.
//!
//! A split sends a row left when `x < threshold`, right otherwise, and routes
//! missing values (`NaN`) according to `missing_left`.

use firerisk_data::frame::FeatureMatrix;
use serde::{Deserialize, Serialize};

use crate::{ModelError, bind_columns, sigmoid};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        /// Index into [`BoostedTrees::feature_names`].
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        value: f64,
    },
}

fn default_missing_left() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Leaf value reached by `row`, or the offending node if the tree is
    /// malformed.
    fn leaf_value(&self, row: &[f64], columns: &[usize]) -> Result<f64, usize> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx).ok_or(idx)? {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let col = *columns.get(*feature).ok_or(idx)?;
                    let x = row[col];
                    let next = if x.is_nan() {
                        if *missing_left { *left } else { *right }
                    } else if x < *threshold {
                        *left
                    } else {
                        *right
                    };
                    if next <= idx {
                        return Err(idx);
                    }
                    idx = next;
                }
            }
        }
    }

    fn check(&self, n_features: usize) -> Result<(), usize> {
        if self.nodes.is_empty() {
            return Err(0);
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature, left, right, ..
            } = node
            {
                let child_ok = |c: usize| c > idx && c < self.nodes.len();
                if *feature >= n_features || !child_ok(*left) || !child_ok(*right) {
                    return Err(idx);
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BoostedTrees {
    pub feature_names: Vec<String>,
    /// Initial margin added before the tree outputs.
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl BoostedTrees {
    /// Checks that every tree is non-empty, references known features, and
    /// only points to later nodes.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (tree, t) in self.trees.iter().enumerate() {
            t.check(self.feature_names.len())
                .map_err(|node| ModelError::InvalidTree { tree, node })?;
        }
        Ok(())
    }

    /// Probability of high risk for every row of `features`.
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        let columns = bind_columns(&self.feature_names, features)?;
        features
            .rows()
            .map(|row| {
                let mut margin = self.base_score;
                for (tree, t) in self.trees.iter().enumerate() {
                    margin += t
                        .leaf_value(row, &columns)
                        .map_err(|node| ModelError::InvalidTree { tree, node })?;
                }
                Ok(sigmoid(margin))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use firerisk_data::grid_id::GridId;

    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64, missing_left: bool) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                    missing_left,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    fn model() -> BoostedTrees {
        BoostedTrees {
            feature_names: vec!["FIRES".into(), "DRY_DAYS".into()],
            base_score: -0.5,
            trees: vec![stump(0, 1.0, -1.0, 1.0, true), stump(1, 10.0, 0.0, 1.5, false)],
        }
    }

    fn features(rows: &[[f64; 2]]) -> FeatureMatrix {
        let mut features = FeatureMatrix::new(vec!["DRY_DAYS".into(), "FIRES".into()]);
        for (i, row) in rows.iter().enumerate() {
            features.push_row(GridId::new(&i.to_string()), row);
        }
        features
    }

    #[test]
    fn test_sums_leaves() {
        // columns are [DRY_DAYS, FIRES]
        let proba = model()
            .predict_proba(&features(&[[0.0, 0.0], [20.0, 3.0]]))
            .unwrap();
        assert!((proba[0] - sigmoid(-1.5)).abs() < 1e-12);
        assert!((proba[1] - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_values_follow_default_direction() {
        let proba = model()
            .predict_proba(&features(&[[f64::NAN, f64::NAN]]))
            .unwrap();
        // FIRES missing -> left (-1.0), DRY_DAYS missing -> right (1.5)
        assert!((proba[0] - sigmoid(0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut model = model();
        model.trees[1].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 1.0,
            left: 0,
            right: 2,
            missing_left: true,
        };
        assert_eq!(
            model.validate(),
            Err(ModelError::InvalidTree { tree: 1, node: 0 })
        );
        assert!(model.predict_proba(&features(&[[0.0, 0.0]])).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature_and_empty_tree() {
        let mut unknown_feature = model();
        unknown_feature.trees[0] = stump(5, 0.0, 0.0, 0.0, true);
        assert!(unknown_feature.validate().is_err());

        let mut empty_tree = model();
        empty_tree.trees.push(RegressionTree { nodes: vec![] });
        assert_eq!(
            empty_tree.validate(),
            Err(ModelError::InvalidTree { tree: 2, node: 0 })
        );
    }

    #[test]
    fn test_deserialize_json() {
        let json = r#"{
            "feature_names": ["FIRES"],
            "trees": [{ "nodes": [
                { "split": { "feature": 0, "threshold": 0.5, "left": 1, "right": 2 } },
                { "leaf": { "value": -2.0 } },
                { "leaf": { "value": 2.0 } }
            ] }]
        }"#;
        let model: BoostedTrees = serde_json::from_str(json).unwrap();
        assert_eq!(model.base_score, 0.0);
        assert!(model.validate().is_ok());
        assert!(matches!(
            model.trees[0].nodes[0],
            TreeNode::Split {
                missing_left: true,
                ..
            }
        ));
    }
}
