//! Decision tree and forest representation.
//!
//! Trees store their nodes in a flat vector with the root at index 0.
//! Leaf values already include the learning-rate shrinkage applied at
//! training time, so prediction is a plain sum over trees.

/// Split predicate of an internal node.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitKind {
    /// `value <= threshold` goes left. Missing values follow
    /// `default_left`.
    Numeric { threshold: f32, default_left: bool },
    /// Category code contained in `left_categories` (sorted) goes
    /// left. Missing values follow `default_left`.
    Categorical {
        left_categories: Vec<u32>,
        default_left: bool,
    },
}

/// One tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature: u32,
        kind: SplitKind,
        left: u32,
        right: u32,
    },
    Leaf {
        value: f32,
    },
}

/// Evaluate a split predicate against a raw feature value.
///
/// `missing_as_zero` mirrors the trainer's missing-value policy: when
/// missing handling is disabled, NaN is read as zero instead of
/// following the learned default branch.
pub(crate) fn split_goes_left(value: f32, kind: &SplitKind, missing_as_zero: bool) -> bool {
    let value = if missing_as_zero && value.is_nan() {
        0.0
    } else {
        value
    };
    match kind {
        SplitKind::Numeric {
            threshold,
            default_left,
        } => {
            if value.is_nan() {
                *default_left
            } else {
                value <= *threshold
            }
        }
        SplitKind::Categorical {
            left_categories,
            default_left,
        } => {
            if value.is_nan() {
                *default_left
            } else {
                left_categories.binary_search(&(value as u32)).is_ok()
            }
        }
    }
}

/// A single regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        debug_assert!(!nodes.is_empty(), "tree must have a root");
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Predict the tree's contribution for one sample.
    pub fn predict_row(&self, features: &[f32], missing_as_zero: bool) -> f32 {
        let mut index = 0usize;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    kind,
                    left,
                    right,
                } => {
                    let value = features[*feature as usize];
                    index = if split_goes_left(value, kind, missing_as_zero) {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
            }
        }
    }
}

/// An additive ensemble of regression trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f32,
    missing_as_zero: bool,
}

impl Forest {
    pub fn new(base_score: f32, missing_as_zero: bool) -> Self {
        Self {
            trees: Vec::new(),
            base_score,
            missing_as_zero,
        }
    }

    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    pub fn missing_as_zero(&self) -> bool {
        self.missing_as_zero
    }

    /// Predict one sample: base score plus every tree's contribution.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        self.trees.iter().fold(self.base_score, |acc, tree| {
            acc + tree.predict_row(features, self.missing_as_zero)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        Tree::new(vec![
            Node::Split {
                feature: 0,
                kind: SplitKind::Numeric {
                    threshold: 1.0,
                    default_left: false,
                },
                left: 1,
                right: 2,
            },
            Node::Leaf { value: -1.0 },
            Node::Leaf { value: 1.0 },
        ])
    }

    #[test]
    fn numeric_split_routes_by_threshold() {
        let tree = stump();
        assert_eq!(tree.predict_row(&[0.5], false), -1.0);
        assert_eq!(tree.predict_row(&[1.0], false), -1.0);
        assert_eq!(tree.predict_row(&[1.5], false), 1.0);
    }

    #[test]
    fn missing_follows_default_branch() {
        let tree = stump();
        assert_eq!(tree.predict_row(&[f32::NAN], false), 1.0);
    }

    #[test]
    fn missing_as_zero_reads_nan_as_zero() {
        let tree = stump();
        // 0.0 <= 1.0, so the zero-substituted value goes left even
        // though the default branch is right.
        assert_eq!(tree.predict_row(&[f32::NAN], true), -1.0);
    }

    #[test]
    fn categorical_split_routes_by_membership() {
        let tree = Tree::new(vec![
            Node::Split {
                feature: 0,
                kind: SplitKind::Categorical {
                    left_categories: vec![1, 4],
                    default_left: true,
                },
                left: 1,
                right: 2,
            },
            Node::Leaf { value: 10.0 },
            Node::Leaf { value: 20.0 },
        ]);
        assert_eq!(tree.predict_row(&[4.0], false), 10.0);
        assert_eq!(tree.predict_row(&[2.0], false), 20.0);
        assert_eq!(tree.predict_row(&[f32::NAN], false), 10.0);
    }

    #[test]
    fn forest_sums_contributions() {
        let mut forest = Forest::new(5.0, false);
        forest.push_tree(stump());
        forest.push_tree(stump());
        assert_eq!(forest.predict_row(&[0.0]), 3.0);
        assert_eq!(forest.predict_row(&[2.0]), 7.0);
    }
}
