//! Random forest fitting
//!
//! Bootstrap-aggregated CART trees grown on gini impurity. Each split looks at
//! a random subset of features; trees are grown until their leaves are pure or
//! no feature separates the remaining rows.

use crate::logistic::sample_weights;
use crate::TrainingError;
use inference_engine::{DecisionTree, RandomForest, TreeNode};
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Forest settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    /// Nodes with fewer distinct rows become leaves
    pub min_samples_split: usize,
    /// Features examined per split; `sqrt(n_features)` when absent
    pub max_features: Option<usize>,
    /// Weight classes inversely to their frequency
    pub balanced: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            balanced: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    row: usize,
    weight: f64,
}

struct TreeGrower<'a> {
    x: &'a Array2<f64>,
    y: &'a [u8],
    params: &'a ForestParams,
    max_features: usize,
    rng: ChaCha8Rng,
    nodes: Vec<TreeNode>,
}

fn gini(dist: [f64; 2]) -> f64 {
    let total = dist[0] + dist[1];
    if total <= 0.0 {
        return 0.0;
    }
    let (p0, p1) = (dist[0] / total, dist[1] / total);
    1.0 - p0 * p0 - p1 * p1
}

impl TreeGrower<'_> {
    fn distribution(&self, samples: &[Sample]) -> [f64; 2] {
        samples.iter().fold([0.0; 2], |mut acc, s| {
            acc[usize::from(self.y[s.row])] += s.weight;
            acc
        })
    }

    /// Append the subtree for `samples` in preorder and return its root index
    fn grow(&mut self, samples: Vec<Sample>, depth: usize) -> usize {
        let dist = self.distribution(&samples);
        let total = dist[0] + dist[1];
        let idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            probabilities: [dist[0] / total, dist[1] / total],
        });

        let pure = dist[0] == 0.0 || dist[1] == 0.0;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || samples.len() < self.params.min_samples_split {
            return idx;
        }

        let Some((feature, threshold)) = self.best_split(&samples) else {
            return idx;
        };
        let (left, right): (Vec<Sample>, Vec<Sample>) = samples
            .into_iter()
            .partition(|s| self.x[[s.row, feature]] <= threshold);

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[idx] = TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        };
        idx
    }

    /// Lowest weighted child impurity over a random feature subset
    fn best_split(&mut self, samples: &[Sample]) -> Option<(usize, f64)> {
        let dist = self.distribution(samples);
        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<(f64, usize, f64)> = None;
        let mut examined = 0;
        for feature in features {
            // Keep looking past the budget until some split is found
            if examined >= self.max_features && best.is_some() {
                break;
            }

            let mut column: Vec<(f64, u8, f64)> = samples
                .iter()
                .map(|s| (self.x[[s.row, feature]], self.y[s.row], s.weight))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (Some(first), Some(last)) = (column.first(), column.last()) else {
                continue;
            };
            // Constant features do not count against the budget
            if first.0 == last.0 {
                continue;
            }
            examined += 1;

            let mut left = [0.0; 2];
            for pair in column.windows(2) {
                let (value, label, weight) = pair[0];
                left[usize::from(label)] += weight;
                let next = pair[1].0;
                if value == next {
                    continue;
                }
                let right = [dist[0] - left[0], dist[1] - left[1]];
                let impurity = (left[0] + left[1]) * gini(left) + (right[0] + right[1]) * gini(right);
                if best.map_or(true, |(b, _, _)| impurity < b) {
                    let mid = value + (next - value) / 2.0;
                    let threshold = if mid < next { mid } else { value };
                    best = Some((impurity, feature, threshold));
                }
            }
        }

        best.map(|(_, feature, threshold)| (feature, threshold))
    }
}

/// Fits a [`RandomForest`] artifact
#[derive(Debug, Clone, Default)]
pub struct ForestTrainer {
    params: ForestParams,
}

impl ForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    /// Fit on scaled rows `x` with labels `y`
    pub fn fit(&self, x: &Array2<f64>, y: &[u8]) -> Result<RandomForest, TrainingError> {
        if x.nrows() != y.len() {
            return Err(TrainingError::InvalidParameter(format!(
                "{} rows for {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if self.params.n_trees == 0 {
            return Err(TrainingError::InvalidParameter("n_trees must be positive".to_string()));
        }

        let n = y.len();
        let n_features = x.ncols();
        let class_weights = sample_weights(y, self.params.balanced)?;
        let max_features = self
            .params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt() as usize)
            .clamp(1, n_features.max(1));

        info!(
            "Fitting random forest: {} trees, {} rows, {} features ({} per split)",
            self.params.n_trees, n, n_features, max_features
        );

        let trees = (0..self.params.n_trees)
            .map(|t| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed.wrapping_add(t as u64));
                let mut counts = vec![0usize; n];
                for _ in 0..n {
                    counts[rng.gen_range(0..n)] += 1;
                }
                let samples: Vec<Sample> = counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &count)| count > 0)
                    .map(|(row, &count)| Sample {
                        row,
                        weight: count as f64 * class_weights[row],
                    })
                    .collect();

                let mut grower = TreeGrower {
                    x,
                    y,
                    params: &self.params,
                    max_features,
                    rng,
                    nodes: Vec::new(),
                };
                grower.grow(samples, 0);
                debug!("tree {}: {} nodes", t, grower.nodes.len());
                DecisionTree { nodes: grower.nodes }
            })
            .collect();

        Ok(RandomForest { n_features, trees })
    }
}
