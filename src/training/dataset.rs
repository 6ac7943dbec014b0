//! Feature matrix fed to the boosted-tree trainer.
//!
//! # Storage Layout
//!
//! Values are stored **feature-major**: `[n_features, n_samples]`, so
//! one feature's values across all samples are contiguous. Split
//! finding scans features; prediction gathers one sample at a time.

use ndarray::{Array2, ArrayView1};

/// How the trainer interprets one feature's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Continuous numeric feature. Missing values: `f32::NAN`.
    Numeric,
    /// Integer category codes `0..n_categories` stored as floats.
    /// Missing / unseen values: `f32::NAN`.
    Categorical { n_categories: u32 },
}

impl FeatureKind {
    pub fn is_categorical(&self) -> bool {
        matches!(self, FeatureKind::Categorical { .. })
    }
}

/// The packed, post-transform representation of all feature columns.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// `[n_features, n_samples]`, feature-major.
    values: Array2<f32>,
    kinds: Vec<FeatureKind>,
    names: Vec<String>,
}

impl FeatureMatrix {
    /// Create a feature matrix from feature-major data.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `kinds` and `names` match the feature count.
    pub fn new(values: Array2<f32>, kinds: Vec<FeatureKind>, names: Vec<String>) -> Self {
        debug_assert_eq!(values.nrows(), kinds.len());
        debug_assert_eq!(values.nrows(), names.len());
        Self {
            values,
            kinds,
            names,
        }
    }

    pub fn n_features(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    /// One feature's values across all samples.
    pub fn feature(&self, feature: usize) -> ArrayView1<'_, f32> {
        self.values.row(feature)
    }

    pub fn kind(&self, feature: usize) -> FeatureKind {
        self.kinds[feature]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Gather one sample's feature vector into `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() != n_features()`.
    pub fn fill_sample(&self, sample: usize, out: &mut [f32]) {
        assert_eq!(out.len(), self.n_features());
        for (feature, slot) in out.iter_mut().enumerate() {
            *slot = self.values[(feature, sample)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn layout_is_feature_major() {
        let m = FeatureMatrix::new(
            array![[1.0, 2.0, 3.0], [10.0, 20.0, 30.0]],
            vec![FeatureKind::Numeric, FeatureKind::Numeric],
            vec!["a".into(), "b".into()],
        );
        assert_eq!(m.n_features(), 2);
        assert_eq!(m.n_samples(), 3);
        assert_eq!(m.feature(1)[2], 30.0);

        let mut sample = vec![0.0; 2];
        m.fill_sample(1, &mut sample);
        assert_eq!(sample, vec![2.0, 20.0]);
    }
}
