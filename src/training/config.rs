//! Boosted-tree trainer configuration.
//!
//! [`TrainerConfig`] is the flat record of externally tunable
//! hyperparameters for the boosted-tree regressor. Defaults reproduce
//! the tuned values the interactive model builder ships with. The
//! builder validates at `build()`; a [`TrainerConfig::default()`] is
//! always valid.
//!
//! # Example
//!
//! ```
//! use otoprice::training::TrainerConfig;
//!
//! // All defaults
//! let config = TrainerConfig::builder().build().unwrap();
//! assert_eq!(config.number_of_iterations, 50);
//!
//! // Tune a subset
//! let config = TrainerConfig::builder()
//!     .number_of_iterations(200)
//!     .learning_rate(0.05)
//!     .number_of_leaves(31)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::pipeline::ConfigurationError;

/// Hyperparameters for the boosted-tree regressor.
///
/// Every field is independently settable. Values are snapshotted into
/// the pipeline at build time; mutating a caller-held config after
/// `build()` does not affect a run in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct TrainerConfig {
    /// Number of boosting rounds. Default: 50.
    #[builder(default = 50)]
    pub number_of_iterations: u32,

    /// Shrinkage applied to every tree's contribution. Default: 0.07721677.
    #[builder(default = 0.077_216_77)]
    pub learning_rate: f32,

    /// Maximum leaves per tree (leaf-wise growth). Default: 91.
    #[builder(default = 91)]
    pub number_of_leaves: u32,

    /// Minimum examples a leaf must keep. Default: 20.
    #[builder(default = 20)]
    pub minimum_example_count_per_leaf: u32,

    /// Split categorical features on category subsets instead of
    /// expanded indicator columns. Default: true.
    #[builder(default = true)]
    pub use_categorical_split: bool,

    /// Route missing values down a learned default branch. When false,
    /// missing values are read as zero. Default: true.
    #[builder(default = true)]
    pub handle_missing_value: bool,

    /// Minimum examples a single category needs to be considered on its
    /// own in a categorical split. Default: 100.
    #[builder(default = 100)]
    pub minimum_example_count_per_group: u32,

    /// Maximum split points evaluated in one categorical split search.
    /// Default: 8.
    #[builder(default = 8)]
    pub maximum_categorical_split_point_count: u32,

    /// Smoothing added to per-category statistics when ordering
    /// categories. Default: 20.
    #[builder(default = 20.0)]
    pub categorical_smoothing: f32,

    /// Extra L2 regularization applied on the categorical split path.
    /// Default: 0.1.
    #[builder(default = 0.1)]
    pub l2_categorical_regularization: f32,

    /// Booster L1 regularization on leaf weights. Default: 0.5.
    #[builder(default = 0.5)]
    pub l1_regularization: f32,

    /// Booster L2 regularization on leaf weights. Default: 0.0.
    #[builder(default = 0.0)]
    pub l2_regularization: f32,
}

/// Custom finishing function that validates the config.
impl<S: trainer_config_builder::IsComplete> TrainerConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if any parameter is invalid:
    /// non-positive learning rate, zero iterations, fewer than two
    /// leaves, zero minimum counts, or negative regularization.
    pub fn build(self) -> Result<TrainerConfig, ConfigurationError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl TrainerConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.learning_rate <= 0.0 {
            return Err(ConfigurationError::InvalidLearningRate(self.learning_rate));
        }
        if self.number_of_iterations == 0 {
            return Err(ConfigurationError::InvalidIterations);
        }
        if self.number_of_leaves < 2 {
            return Err(ConfigurationError::InvalidLeafCount(self.number_of_leaves));
        }
        if self.minimum_example_count_per_leaf == 0 {
            return Err(ConfigurationError::InvalidMinimumCount {
                field: "minimum_example_count_per_leaf",
            });
        }
        if self.minimum_example_count_per_group == 0 {
            return Err(ConfigurationError::InvalidMinimumCount {
                field: "minimum_example_count_per_group",
            });
        }
        if self.maximum_categorical_split_point_count == 0 {
            return Err(ConfigurationError::InvalidSplitPointCount);
        }

        let non_negative: [(&'static str, f32); 4] = [
            ("categorical_smoothing", self.categorical_smoothing),
            (
                "l2_categorical_regularization",
                self.l2_categorical_regularization,
            ),
            ("l1_regularization", self.l1_regularization),
            ("l2_regularization", self.l2_regularization),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigurationError::InvalidRegularization { field, value });
            }
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================
