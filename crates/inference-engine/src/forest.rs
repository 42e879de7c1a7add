//! Random forest of binary decision trees

use crate::classifier::{check_width, Classifier};
use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Node of a fitted decision tree
///
/// Children always sit after their parent in the node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution of the training rows that reached the leaf
    Leaf { probabilities: [f64; 2] },
}

/// Fitted decision tree, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Check node references and split features
    pub fn validate(&self, n_features: usize) -> Result<(), InferenceError> {
        if self.nodes.is_empty() {
            return Err(InferenceError::ModelLoadError("decision tree has no nodes".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(InferenceError::ModelLoadError(format!(
                        "node {idx} splits on feature {feature}, model has {n_features}"
                    )));
                }
                for child in [*left, *right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(InferenceError::ModelLoadError(format!(
                            "node {idx} references invalid child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf distribution reached by a row
    pub fn leaf_probabilities(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        let mut idx = 0;
        // Children follow parents, so a walk is bounded by the node count
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { probabilities }) => return Ok(*probabilities),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().ok_or_else(|| {
                        InferenceError::InferenceFailed(format!("feature {feature} out of bounds"))
                    })?;
                    idx = if value <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(InferenceError::InferenceFailed(format!(
            "decision tree walk did not reach a leaf (node {idx})"
        )))
    }
}

/// Ensemble averaging the leaf distributions of its trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    /// Input width the forest was fitted on
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Check every tree against the declared input width
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::ModelLoadError("random forest has no trees".to_string()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.n_features))
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        check_width(self.n_features, row)?;
        let mut total = [0.0; 2];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_probabilities(row)?;
            total[0] += p0;
            total[1] += p1;
        }
        let n = self.trees.len().max(1) as f64;
        Ok([total[0] / n, total[1] / n])
    }
}
