//! Gradient-boosted tree regressor.
//!
//! A compact boosting backend: squared-loss gradients, exact greedy
//! split finding, and leaf-wise growth bounded by the configured leaf
//! count. Numeric features split on thresholds; categorical features
//! split on category subsets, ordered by smoothed per-category
//! statistics and bounded by the configured split-point budget.
//! Missing values (NaN) either follow a learned default branch or are
//! read as zero, per the missing-value toggle.

use super::config::TrainerConfig;
use super::dataset::{FeatureKind, FeatureMatrix};
use super::error::TrainingError;
use super::logger::{TrainingLogger, Verbosity};
use super::tree::{split_goes_left, Forest, Node, SplitKind, Tree};

// =============================================================================
// BoosterParams
// =============================================================================

/// Parameters consumed by the boosting backend.
///
/// A flat projection of [`TrainerConfig`]: the categorical-split toggle
/// itself is consumed upstream by the feature encoder (it decides
/// whether categorical columns arrive as codes or indicator columns),
/// everything else lands here.
#[derive(Debug, Clone)]
pub struct BoosterParams {
    pub n_rounds: u32,
    pub learning_rate: f32,
    pub max_leaves: u32,
    pub min_examples_per_leaf: u32,
    pub handle_missing: bool,
    pub min_examples_per_group: u32,
    pub max_categorical_split_points: u32,
    pub categorical_smoothing: f32,
    pub l2_categorical: f32,
    pub l1: f32,
    pub l2: f32,
}

impl BoosterParams {
    pub fn from_config(config: &TrainerConfig) -> Self {
        Self {
            n_rounds: config.number_of_iterations,
            learning_rate: config.learning_rate,
            max_leaves: config.number_of_leaves,
            min_examples_per_leaf: config.minimum_example_count_per_leaf,
            handle_missing: config.handle_missing_value,
            min_examples_per_group: config.minimum_example_count_per_group,
            max_categorical_split_points: config.maximum_categorical_split_point_count,
            categorical_smoothing: config.categorical_smoothing,
            l2_categorical: config.l2_categorical_regularization,
            l1: config.l1_regularization,
            l2: config.l2_regularization,
        }
    }
}

// =============================================================================
// GradientBooster
// =============================================================================

/// Boosted-tree trainer over a packed [`FeatureMatrix`].
pub struct GradientBooster {
    params: BoosterParams,
    verbosity: Verbosity,
}

/// A split candidate for one open leaf.
struct SplitCandidate {
    gain: f64,
    feature: u32,
    kind: SplitKind,
}

/// A leaf still eligible for splitting while a tree grows.
struct OpenLeaf {
    slot: usize,
    rows: Vec<u32>,
    grad_sum: f64,
    candidate: Option<SplitCandidate>,
}

impl GradientBooster {
    pub fn new(params: BoosterParams) -> Self {
        Self {
            params,
            verbosity: Verbosity::default(),
        }
    }

    /// Set training-progress verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Fit a forest to the given features and targets.
    ///
    /// Deterministic: the same inputs and parameters always produce
    /// the same forest.
    pub fn fit(&self, features: &FeatureMatrix, targets: &[f32]) -> Result<Forest, TrainingError> {
        let n = features.n_samples();
        if n == 0 {
            return Err(TrainingError::EmptyTrainingData);
        }
        if targets.len() != n {
            return Err(TrainingError::TargetMismatch {
                n_samples: n,
                n_targets: targets.len(),
            });
        }
        if features.n_features() == 0 {
            return Err(TrainingError::FitFailed(
                "feature matrix has no features".into(),
            ));
        }

        let base = targets.iter().map(|&t| t as f64).sum::<f64>() / n as f64;
        let missing_as_zero = !self.params.handle_missing;

        let mut predictions = vec![base as f32; n];
        let mut gradients = vec![0.0f32; n];
        let mut forest = Forest::new(base as f32, missing_as_zero);

        let logger = TrainingLogger::new(self.verbosity);
        logger.start_training(self.params.n_rounds as usize, n);

        for round in 0..self.params.n_rounds {
            // Squared loss: gradient = prediction - target, hessian = 1.
            for i in 0..n {
                gradients[i] = predictions[i] - targets[i];
            }

            let (tree, deltas) = self.grow_tree(features, &gradients);
            for i in 0..n {
                predictions[i] += deltas[i];
            }
            forest.push_tree(tree);

            if self.verbosity == Verbosity::Info {
                logger.round(round as usize, rmse(&predictions, targets));
            }
        }

        logger.finish(forest.n_trees());
        Ok(forest)
    }

    // =========================================================================
    // Tree growth
    // =========================================================================

    /// Grow one tree leaf-wise and return it together with the
    /// per-row prediction deltas its leaves contribute.
    fn grow_tree(&self, features: &FeatureMatrix, gradients: &[f32]) -> (Tree, Vec<f32>) {
        let n = gradients.len();
        let missing_as_zero = !self.params.handle_missing;

        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let rows: Vec<u32> = (0..n as u32).collect();
        let grad_sum = leaf_grad_sum(gradients, &rows);
        let mut root = OpenLeaf {
            slot: 0,
            rows,
            grad_sum,
            candidate: None,
        };
        root.candidate = self.find_best_split(features, gradients, &root);

        let mut open = vec![root];
        let mut n_leaves = 1u32;

        while n_leaves < self.params.max_leaves {
            let Some(best_idx) = open
                .iter()
                .enumerate()
                .filter(|(_, leaf)| leaf.candidate.is_some())
                .max_by(|(_, a), (_, b)| {
                    let ga = a.candidate.as_ref().map(|c| c.gain).unwrap_or(f64::MIN);
                    let gb = b.candidate.as_ref().map(|c| c.gain).unwrap_or(f64::MIN);
                    ga.total_cmp(&gb)
                })
                .map(|(i, _)| i)
            else {
                break;
            };

            let leaf = open.swap_remove(best_idx);
            let candidate = leaf.candidate.expect("picked leaf has a candidate");

            let values = features.feature(candidate.feature as usize);
            let (left_rows, right_rows): (Vec<u32>, Vec<u32>) =
                leaf.rows.iter().copied().partition(|&row| {
                    split_goes_left(values[row as usize], &candidate.kind, missing_as_zero)
                });

            let left_slot = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            let right_slot = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            nodes[leaf.slot] = Node::Split {
                feature: candidate.feature,
                kind: candidate.kind,
                left: left_slot as u32,
                right: right_slot as u32,
            };

            for (slot, rows) in [(left_slot, left_rows), (right_slot, right_rows)] {
                let grad_sum = leaf_grad_sum(gradients, &rows);
                let mut child = OpenLeaf {
                    slot,
                    rows,
                    grad_sum,
                    candidate: None,
                };
                child.candidate = self.find_best_split(features, gradients, &child);
                open.push(child);
            }
            n_leaves += 1;
        }

        let mut deltas = vec![0.0f32; n];
        for leaf in &open {
            let value = self.leaf_value(leaf.grad_sum, leaf.rows.len());
            nodes[leaf.slot] = Node::Leaf { value };
            for &row in &leaf.rows {
                deltas[row as usize] = value;
            }
        }
        (Tree::new(nodes), deltas)
    }

    fn leaf_value(&self, grad_sum: f64, count: usize) -> f32 {
        let numerator = -threshold_l1(grad_sum, self.params.l1 as f64);
        let weight = numerator / (count as f64 + self.params.l2 as f64);
        (weight * self.params.learning_rate as f64) as f32
    }

    // =========================================================================
    // Split finding
    // =========================================================================

    fn find_best_split(
        &self,
        features: &FeatureMatrix,
        gradients: &[f32],
        leaf: &OpenLeaf,
    ) -> Option<SplitCandidate> {
        let min_leaf = self.params.min_examples_per_leaf as usize;
        if leaf.rows.len() < 2 * min_leaf {
            return None;
        }

        let mut best: Option<SplitCandidate> = None;
        for feature in 0..features.n_features() {
            let candidate = match features.kind(feature) {
                FeatureKind::Numeric => {
                    self.best_numeric_split(features, gradients, leaf, feature)
                }
                FeatureKind::Categorical { n_categories } => {
                    self.best_categorical_split(features, gradients, leaf, feature, n_categories)
                }
            };
            if let Some(candidate) = candidate {
                let better = best
                    .as_ref()
                    .map(|b| candidate.gain > b.gain)
                    .unwrap_or(true);
                if better {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_numeric_split(
        &self,
        features: &FeatureMatrix,
        gradients: &[f32],
        leaf: &OpenLeaf,
        feature: usize,
    ) -> Option<SplitCandidate> {
        let values = features.feature(feature);
        let missing_as_zero = !self.params.handle_missing;
        let min_leaf = self.params.min_examples_per_leaf as usize;
        let lambda = self.params.l2 as f64;

        let mut pairs: Vec<(f32, f32)> = Vec::with_capacity(leaf.rows.len());
        let mut miss_grad = 0.0f64;
        let mut miss_count = 0usize;
        for &row in &leaf.rows {
            let mut value = values[row as usize];
            if value.is_nan() {
                if missing_as_zero {
                    value = 0.0;
                } else {
                    miss_grad += gradients[row as usize] as f64;
                    miss_count += 1;
                    continue;
                }
            }
            pairs.push((value, gradients[row as usize]));
        }
        if pairs.len() < 2 {
            return None;
        }
        pairs.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let total_grad = leaf.grad_sum;
        let total_count = leaf.rows.len();
        let parent_score = self.split_score(total_grad, total_count as f64, lambda);

        let mut best: Option<(f64, f32, bool)> = None; // (gain, threshold, missing_left)
        let mut left_grad = 0.0f64;
        let mut left_count = 0usize;
        for i in 0..pairs.len() - 1 {
            left_grad += pairs[i].1 as f64;
            left_count += 1;
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }
            let threshold = ((pairs[i].0 as f64 + pairs[i + 1].0 as f64) * 0.5) as f32;

            let placements: &[bool] = if miss_count == 0 { &[false] } else { &[true, false] };
            for &missing_left in placements {
                let (gl, cl) = if missing_left {
                    (left_grad + miss_grad, left_count + miss_count)
                } else {
                    (left_grad, left_count)
                };
                let (gr, cr) = (total_grad - gl, total_count - cl);
                if cl < min_leaf || cr < min_leaf {
                    continue;
                }
                let gain = self.split_score(gl, cl as f64, lambda)
                    + self.split_score(gr, cr as f64, lambda)
                    - parent_score;
                let better = best.map(|(g, _, _)| gain > g).unwrap_or(gain > 0.0);
                if gain > 0.0 && better {
                    // No missing observed: unseen NaN at predict time
                    // follows the heavier side.
                    let default_left = if miss_count == 0 { cl >= cr } else { missing_left };
                    best = Some((gain, threshold, default_left));
                }
            }
        }

        // The boundary scan only separates distinct present values; a
        // present-vs-missing split has to be offered explicitly.
        if miss_count >= min_leaf && pairs.len() >= min_leaf {
            let present_grad = total_grad - miss_grad;
            let gain = self.split_score(present_grad, pairs.len() as f64, lambda)
                + self.split_score(miss_grad, miss_count as f64, lambda)
                - parent_score;
            let better = best.map(|(g, _, _)| gain > g).unwrap_or(gain > 0.0);
            if gain > 0.0 && better {
                let threshold = pairs[pairs.len() - 1].0;
                best = Some((gain, threshold, false));
            }
        }

        best.map(|(gain, threshold, default_left)| SplitCandidate {
            gain,
            feature: feature as u32,
            kind: SplitKind::Numeric {
                threshold,
                default_left,
            },
        })
    }

    fn best_categorical_split(
        &self,
        features: &FeatureMatrix,
        gradients: &[f32],
        leaf: &OpenLeaf,
        feature: usize,
        n_categories: u32,
    ) -> Option<SplitCandidate> {
        let values = features.feature(feature);
        let min_leaf = self.params.min_examples_per_leaf as usize;
        let min_group = self.params.min_examples_per_group as usize;
        let lambda = (self.params.l2 + self.params.l2_categorical) as f64;
        let smoothing = self.params.categorical_smoothing as f64;

        let mut cat_grad = vec![0.0f64; n_categories as usize];
        let mut cat_count = vec![0usize; n_categories as usize];
        let mut miss_grad = 0.0f64;
        let mut miss_count = 0usize;
        for &row in &leaf.rows {
            let value = values[row as usize];
            if value.is_nan() {
                miss_grad += gradients[row as usize] as f64;
                miss_count += 1;
            } else {
                let code = value as usize;
                cat_grad[code] += gradients[row as usize] as f64;
                cat_count[code] += 1;
            }
        }

        // Categories below the per-group minimum stay on the right side.
        let mut order: Vec<u32> = (0..n_categories)
            .filter(|&c| cat_count[c as usize] >= min_group.max(1))
            .collect();
        if order.is_empty() {
            return None;
        }
        order.sort_unstable_by(|&a, &b| {
            let sa = cat_grad[a as usize] / (cat_count[a as usize] as f64 + smoothing);
            let sb = cat_grad[b as usize] / (cat_count[b as usize] as f64 + smoothing);
            sa.total_cmp(&sb)
        });

        let total_grad = leaf.grad_sum;
        let total_count = leaf.rows.len();
        let parent_score = self.split_score(total_grad, total_count as f64, lambda);

        let limit = (self.params.max_categorical_split_points as usize).min(order.len());
        let mut best: Option<(f64, usize, bool)> = None; // (gain, prefix len, missing_left)
        let mut left_grad = 0.0f64;
        let mut left_count = 0usize;
        for k in 1..=limit {
            let code = order[k - 1] as usize;
            left_grad += cat_grad[code];
            left_count += cat_count[code];

            let placements: &[bool] = if miss_count == 0 { &[false] } else { &[true, false] };
            for &missing_left in placements {
                let (gl, cl) = if missing_left {
                    (left_grad + miss_grad, left_count + miss_count)
                } else {
                    (left_grad, left_count)
                };
                let (gr, cr) = (total_grad - gl, total_count - cl);
                if cl < min_leaf || cr < min_leaf {
                    continue;
                }
                let gain = self.split_score(gl, cl as f64, lambda)
                    + self.split_score(gr, cr as f64, lambda)
                    - parent_score;
                let better = best.map(|(g, _, _)| gain > g).unwrap_or(gain > 0.0);
                if gain > 0.0 && better {
                    best = Some((gain, k, missing_left));
                }
            }
        }

        best.map(|(gain, k, missing_left)| {
            let mut left_categories: Vec<u32> = order[..k].to_vec();
            left_categories.sort_unstable();
            SplitCandidate {
                gain,
                feature: feature as u32,
                kind: SplitKind::Categorical {
                    left_categories,
                    default_left: missing_left,
                },
            }
        })
    }

    fn split_score(&self, grad_sum: f64, hess_sum: f64, lambda: f64) -> f64 {
        let g = threshold_l1(grad_sum, self.params.l1 as f64);
        g * g / (hess_sum + lambda)
    }
}

fn leaf_grad_sum(gradients: &[f32], rows: &[u32]) -> f64 {
    rows.iter().map(|&r| gradients[r as usize] as f64).sum()
}

/// L1 soft-thresholding of an aggregated gradient.
fn threshold_l1(grad_sum: f64, alpha: f64) -> f64 {
    if grad_sum > alpha {
        grad_sum - alpha
    } else if grad_sum < -alpha {
        grad_sum + alpha
    } else {
        0.0
    }
}

fn rmse(predictions: &[f32], targets: &[f32]) -> f64 {
    let n = predictions.len().max(1) as f64;
    let sum_sq: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(&p, &t)| {
            let diff = p as f64 - t as f64;
            diff * diff
        })
        .sum();
    (sum_sq / n).sqrt()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn numeric_matrix(columns: Vec<Vec<f32>>, names: Vec<&str>) -> FeatureMatrix {
        let n_features = columns.len();
        let n_samples = columns[0].len();
        let flat: Vec<f32> = columns.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((n_features, n_samples), flat).unwrap();
        let kinds = vec![FeatureKind::Numeric; n_features];
        FeatureMatrix::new(values, kinds, names.into_iter().map(String::from).collect())
    }

    fn small_params() -> BoosterParams {
        BoosterParams {
            n_rounds: 40,
            learning_rate: 0.3,
            max_leaves: 15,
            min_examples_per_leaf: 2,
            handle_missing: true,
            min_examples_per_group: 1,
            max_categorical_split_points: 8,
            categorical_smoothing: 1.0,
            l2_categorical: 0.0,
            l1: 0.0,
            l2: 0.0,
        }
    }

    #[test]
    fn empty_data_is_rejected() {
        let matrix = numeric_matrix(vec![vec![]], vec!["x"]);
        let booster = GradientBooster::new(small_params());
        assert_eq!(
            booster.fit(&matrix, &[]),
            Err(TrainingError::EmptyTrainingData)
        );
    }

    #[test]
    fn target_mismatch_is_rejected() {
        let matrix = numeric_matrix(vec![vec![1.0, 2.0, 3.0]], vec!["x"]);
        let booster = GradientBooster::new(small_params());
        let err = booster.fit(&matrix, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            TrainingError::TargetMismatch {
                n_samples: 3,
                n_targets: 2
            }
        );
    }

    #[test]
    fn fit_improves_over_base_score_on_linear_problem() {
        let n = 200;
        let xs: Vec<f32> = (0..n).map(|i| i as f32 / 10.0).collect();
        let targets: Vec<f32> = xs.iter().map(|&x| 3.0 * x + 1.0).collect();
        let matrix = numeric_matrix(vec![xs.clone()], vec!["x"]);

        let booster = GradientBooster::new(small_params());
        let forest = booster.fit(&matrix, &targets).unwrap();
        assert_eq!(forest.n_trees(), 40);

        let base = forest.base_score();
        let mut base_err = 0.0f64;
        let mut pred_err = 0.0f64;
        for (i, &x) in xs.iter().enumerate() {
            let pred = forest.predict_row(&[x]);
            base_err += (base as f64 - targets[i] as f64).powi(2);
            pred_err += (pred as f64 - targets[i] as f64).powi(2);
        }
        assert!(
            pred_err < base_err * 0.05,
            "boosting should reduce squared error substantially: {pred_err} vs {base_err}"
        );
    }

    #[test]
    fn minimum_leaf_count_blocks_splits_on_small_leaves() {
        let params = BoosterParams {
            min_examples_per_leaf: 20,
            ..small_params()
        };
        let xs: Vec<f32> = (0..30).map(|i| i as f32).collect();
        let targets: Vec<f32> = xs.iter().map(|&x| x * 2.0).collect();
        let matrix = numeric_matrix(vec![xs], vec!["x"]);

        // 30 rows cannot produce two sides of >= 20 examples.
        let forest = GradientBooster::new(params).fit(&matrix, &targets).unwrap();
        for tree in forest.trees() {
            assert_eq!(tree.n_leaves(), 1);
        }
    }

    #[test]
    fn categorical_split_separates_categories() {
        // Category decides the target exactly: 0 -> 10, 1 -> 50, 2 -> 90.
        let codes: Vec<f32> = (0..120).map(|i| (i % 3) as f32).collect();
        let targets: Vec<f32> = codes.iter().map(|&c| 10.0 + c * 40.0).collect();
        let values = Array2::from_shape_vec((1, codes.len()), codes).unwrap();
        let matrix = FeatureMatrix::new(
            values,
            vec![FeatureKind::Categorical { n_categories: 3 }],
            vec!["fuel".into()],
        );

        let forest = GradientBooster::new(small_params())
            .fit(&matrix, &targets)
            .unwrap();
        for (code, expected) in [(0.0f32, 10.0f32), (1.0, 50.0), (2.0, 90.0)] {
            let pred = forest.predict_row(&[code]);
            assert!(
                (pred - expected).abs() < 1.0,
                "category {code}: predicted {pred}, expected {expected}"
            );
        }
    }

    #[test]
    fn min_examples_per_group_keeps_rare_categories_together() {
        // Category 2 appears twice; with min_examples_per_group = 50 it
        // may never move to the left side on its own.
        let mut codes: Vec<f32> = Vec::new();
        let mut targets: Vec<f32> = Vec::new();
        for i in 0..100 {
            codes.push((i % 2) as f32);
            targets.push(if i % 2 == 0 { 10.0 } else { 90.0 });
        }
        codes.extend([2.0, 2.0]);
        targets.extend([500.0, 500.0]);

        let values = Array2::from_shape_vec((1, codes.len()), codes).unwrap();
        let matrix = FeatureMatrix::new(
            values,
            vec![FeatureKind::Categorical { n_categories: 3 }],
            vec!["model".into()],
        );
        let params = BoosterParams {
            min_examples_per_group: 50,
            ..small_params()
        };
        let forest = GradientBooster::new(params).fit(&matrix, &targets).unwrap();
        for tree in forest.trees() {
            for node in tree.nodes() {
                if let Node::Split {
                    kind: SplitKind::Categorical { left_categories, .. },
                    ..
                } = node
                {
                    assert!(
                        !left_categories.contains(&2),
                        "rare category must not be split out on its own"
                    );
                }
            }
        }
    }

    #[test]
    fn missing_values_follow_a_learned_branch() {
        // Feature is NaN for the high-target group; with missing
        // handling on, the trainer can still separate the two groups.
        let mut xs = Vec::new();
        let mut targets = Vec::new();
        for i in 0..60 {
            if i % 2 == 0 {
                xs.push(1.0);
                targets.push(10.0);
            } else {
                xs.push(f32::NAN);
                targets.push(90.0);
            }
        }
        let matrix = numeric_matrix(vec![xs], vec!["engine"]);
        let forest = GradientBooster::new(small_params())
            .fit(&matrix, &targets)
            .unwrap();

        let pred_present = forest.predict_row(&[1.0]);
        let pred_missing = forest.predict_row(&[f32::NAN]);
        assert!((pred_present - 10.0).abs() < 1.0);
        assert!((pred_missing - 90.0).abs() < 1.0);
    }
}
