use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::{check_width, open, read_json, ArtifactError, Regressor};
use crate::prediction::features::FEATURE_COUNT;

/// Gradient-boosted regression trees exported as JSON.
///
/// ```json
/// {
///   "base_score": 5773.8,
///   "num_features": 14,
///   "trees": [
///     { "nodes": [
///       { "feature": 1, "threshold": 0.12, "left": 1, "right": 2 },
///       { "leaf": -812.5 },
///       { "leaf": 1044.0 }
///     ] }
///   ]
/// }
/// ```
///
/// Traversal starts at node 0 and goes left when `x < threshold`. The prediction is
/// `base_score` plus the reached leaf of every tree.
///
/// Deserializing validates the node graph, so a value obtained through any serde
/// format is safe to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEnsemble {
    base_score: f64,
    num_features: usize,
    trees: Vec<RegressionTree>,
}

// Unchecked wire shape of a model export.
#[derive(Deserialize)]
struct EnsembleExport {
    base_score: f64,
    num_features: usize,
    trees: Vec<RegressionTree>,
}

impl EnsembleExport {
    fn into_ensemble(self) -> Result<TreeEnsemble, ArtifactError> {
        let ensemble = TreeEnsemble {
            base_score: self.base_score,
            num_features: self.num_features,
            trees: self.trees,
        };
        ensemble.check()?;
        Ok(ensemble)
    }
}

impl<'de> Deserialize<'de> for TreeEnsemble {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EnsembleExport::deserialize(deserializer)?
            .into_ensemble()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

impl TreeNode {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Self::Leaf { leaf: value }
    }
}

impl TreeEnsemble {
    pub fn new(base_score: f64, trees: Vec<Vec<TreeNode>>) -> Result<Self, ArtifactError> {
        EnsembleExport {
            base_score,
            num_features: FEATURE_COUNT,
            trees: trees
                .into_iter()
                .map(|nodes| RegressionTree { nodes })
                .collect(),
        }
        .into_ensemble()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = open(path)?;
        Self::from_reader(file, path)
    }

    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, ArtifactError> {
        let export: EnsembleExport = read_json(reader, origin)?;
        export.into_ensemble()
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn check(&self) -> Result<(), ArtifactError> {
        if self.num_features != FEATURE_COUNT {
            return Err(ArtifactError::ShapeMismatch {
                expected: FEATURE_COUNT,
                found: self.num_features,
            });
        }
        if !self.base_score.is_finite() {
            return Err(ArtifactError::Invalid(
                "base_score must be finite".to_string(),
            ));
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            tree.check(self.num_features)
                .map_err(|reason| ArtifactError::Invalid(format!("tree {tree_index}: {reason}")))?;
        }
        Ok(())
    }
}

impl RegressionTree {
    // Children must point forward, which rules out cycles and guarantees every
    // walk ends on a leaf.
    fn check(&self, num_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= num_features {
                        return Err(format!("node {index} splits on unknown feature {feature}"));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {index} has a NaN threshold"));
                    }
                    for child in [left, right] {
                        if child <= index || child >= len {
                            return Err(format!("node {index} has invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {index} has a non-finite leaf"));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { leaf } => return leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] < threshold { left } else { right };
                }
            }
        }
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError> {
        rows.iter()
            .map(|row| {
                check_width(row, self.num_features)?;
                Ok(self.base_score
                    + self
                        .trees
                        .iter()
                        .map(|tree| tree.evaluate(row))
                        .sum::<f64>())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stump(feature: usize, threshold: f64, below: f64, above: f64) -> Vec<TreeNode> {
        vec![
            TreeNode::split(feature, threshold, 1, 2),
            TreeNode::leaf(below),
            TreeNode::leaf(above),
        ]
    }

    #[test]
    fn sums_leaves_over_base_score() {
        let model = TreeEnsemble::new(
            1000.0,
            vec![stump(1, 0.5, -100.0, 250.0), stump(2, 0.0, 10.0, 40.0)],
        )
        .expect("valid ensemble");

        let mut low = vec![0.0; FEATURE_COUNT];
        low[1] = 0.2;
        low[2] = -1.0;
        let mut high = vec![0.0; FEATURE_COUNT];
        high[1] = 0.5;
        high[2] = 0.0;

        let predictions = model.predict(&[low, high]).expect("predicts");
        assert_eq!(predictions, vec![910.0, 1290.0]);
    }

    #[test]
    fn rejects_backward_children() {
        let nodes = vec![
            TreeNode::split(0, 1.0, 1, 2),
            TreeNode::split(0, 1.0, 0, 2),
            TreeNode::leaf(1.0),
        ];
        let err = TreeEnsemble::new(0.0, vec![nodes]).expect_err("cycle rejected");
        assert!(err.to_string().contains("tree 0"));
    }

    #[test]
    fn rejects_unknown_features() {
        let err = TreeEnsemble::new(0.0, vec![stump(FEATURE_COUNT, 0.0, 1.0, 2.0)])
            .expect_err("feature out of range");
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn loads_untagged_nodes_from_json() {
        let json = r#"{
            "base_score": 10.5,
            "num_features": 14,
            "trees": [
                { "nodes": [
                    { "feature": 0, "threshold": 0.0, "left": 1, "right": 2 },
                    { "leaf": -0.5 },
                    { "leaf": 0.5 }
                ] }
            ]
        }"#;
        let model = TreeEnsemble::from_reader(Cursor::new(json), Path::new("model.json"))
            .expect("model loads");
        assert_eq!(model.tree_count(), 1);
        let prediction = model
            .predict(&[vec![1.0; FEATURE_COUNT]])
            .expect("predicts");
        assert_eq!(prediction, vec![11.0]);
    }

    #[test]
    fn direct_deserialization_validates_the_tree() {
        let json = r#"{
            "base_score": 0.0,
            "num_features": 14,
            "trees": [
                { "nodes": [
                    { "feature": 0, "threshold": 0.0, "left": 0, "right": 1 },
                    { "leaf": 1.0 }
                ] }
            ]
        }"#;
        let err = serde_json::from_str::<TreeEnsemble>(json).expect_err("self-loop rejected");
        assert!(err.to_string().contains("invalid child 0"));

        let out_of_range = json.replace(r#""feature": 0"#, r#""feature": 40"#);
        assert!(serde_json::from_str::<TreeEnsemble>(&out_of_range).is_err());
    }

    #[test]
    fn rejects_models_fitted_on_other_widths() {
        let json = r#"{ "base_score": 0.0, "num_features": 12, "trees": [] }"#;
        let err = TreeEnsemble::from_reader(Cursor::new(json), Path::new("model.json"))
            .expect_err("width mismatch");
        assert!(matches!(
            err,
            ArtifactError::ShapeMismatch {
                expected: 14,
                found: 12
            }
        ));
    }
}
