//! Per-run training session.
//!
//! A [`TrainingSession`] is the explicit, immutable context one
//! training run works under: the random seed that drives the shuffle
//! and the held-out fraction. Two sessions never share state; the same
//! seed re-derives the same split, which is how evaluation finds the
//! rows training never saw.

use crate::data::{shuffle_split, DataError, RecordTable};
use crate::eval::{evaluate, RegressionMetrics};
use crate::model::PriceModel;
use crate::pipeline::{ColumnSpec, ConfigurationError, PipelineBuilder};
use crate::training::{TrainerConfig, TrainingError, Verbosity};

/// A session-level failure, tagged by the stage that raised it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("pipeline configuration failed: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("training failed: {0}")]
    Training(#[from] TrainingError),
    #[error("data handling failed: {0}")]
    Data(#[from] DataError),
}

/// Immutable context for one training run.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    seed: u64,
    test_fraction: f32,
    verbosity: Verbosity,
}

impl TrainingSession {
    /// Create a session with the given seed and a 20% held-out split.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            test_fraction: 0.2,
            verbosity: Verbosity::default(),
        }
    }

    /// Override the held-out fraction.
    pub fn with_test_fraction(mut self, test_fraction: f32) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Set training-progress verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the pipeline and fit it on this session's training split.
    ///
    /// The model is returned before any metrics are computed, so a
    /// later evaluation failure never loses a finished fit.
    pub fn fit(
        &self,
        table: &RecordTable,
        columns: &[ColumnSpec],
        config: &TrainerConfig,
    ) -> Result<PriceModel, SessionError> {
        let pipeline = PipelineBuilder::build(columns, config)?.with_verbosity(self.verbosity);
        let split = shuffle_split(table, self.test_fraction, self.seed);
        Ok(pipeline.fit(&split.train)?)
    }

    /// Evaluate a model on this session's held-out split.
    ///
    /// Re-derives the split from the session seed, so the rows are
    /// exactly those [`TrainingSession::fit`] withheld.
    pub fn evaluate(
        &self,
        model: &PriceModel,
        table: &RecordTable,
    ) -> Result<RegressionMetrics, DataError> {
        let split = shuffle_split(table, self.test_fraction, self.seed);
        evaluate(model, &split.test)
    }

    /// Predicted-vs-actual pairs on this session's held-out split,
    /// for the diagnostic scatter plot.
    pub fn holdout_pairs(&self, model: &PriceModel, table: &RecordTable) -> Vec<(f32, f32)> {
        let split = shuffle_split(table, self.test_fraction, self.seed);
        model.transform(&split.test)
    }
}
