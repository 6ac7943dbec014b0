//! The fitted price model.
//!
//! [`PriceModel`] bundles the fitted column encoders with the trained
//! forest. It is the unit that predicts, that evaluation runs over,
//! and that persistence round-trips.

mod persist;

use crate::data::{DataError, Record, RecordTable};
use crate::pipeline::ColumnEncoder;
use crate::training::{Forest, TrainerConfig};

/// A fitted transform-then-regress model for listing prices.
#[derive(Debug)]
pub struct PriceModel {
    encoders: Vec<ColumnEncoder>,
    forest: Forest,
    feature_names: Vec<String>,
    config: TrainerConfig,
}

impl PriceModel {
    pub(crate) fn new(
        encoders: Vec<ColumnEncoder>,
        forest: Forest,
        feature_names: Vec<String>,
        config: TrainerConfig,
    ) -> Self {
        Self {
            encoders,
            forest,
            feature_names,
            config,
        }
    }

    /// Width of the packed feature vector.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Names of the packed features, in feature-vector order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// The trainer configuration the model was fitted with.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// The underlying tree ensemble.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// The fitted column encoders, in pipeline order.
    pub fn encoders(&self) -> &[ColumnEncoder] {
        &self.encoders
    }

    /// Predict the price of one listing.
    pub fn predict(&self, record: &Record) -> f32 {
        let features = self.encode(record);
        self.forest.predict_row(&features)
    }

    /// Run the model over a batch, yielding (actual, predicted) pairs.
    pub fn transform(&self, table: &RecordTable) -> Vec<(f32, f32)> {
        let mut features = vec![0.0f32; self.n_features()];
        table
            .records()
            .iter()
            .map(|record| {
                self.encode_into(record, &mut features);
                (record.price, self.forest.predict_row(&features))
            })
            .collect()
    }

    fn encode(&self, record: &Record) -> Vec<f32> {
        let mut features = vec![0.0f32; self.n_features()];
        self.encode_into(record, &mut features);
        features
    }

    fn encode_into(&self, record: &Record, out: &mut [f32]) {
        let mut offset = 0;
        for encoder in &self.encoders {
            let width = encoder.stage().width();
            encoder.encode_record(record, &mut out[offset..offset + width]);
            offset += width;
        }
    }

    /// Persist the model to a file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), DataError> {
        persist::save(self, path.as_ref())
    }

    /// Load a previously saved model.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, DataError> {
        persist::load(path.as_ref())
    }
}
