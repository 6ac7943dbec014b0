//! Training infrastructure.
//!
//! - [`TrainerConfig`]: externally tunable hyperparameters
//! - [`GradientBooster`] / [`BoosterParams`]: the boosted-tree backend
//! - [`FeatureMatrix`] / [`FeatureKind`]: packed trainer input
//! - [`Forest`] / [`Tree`]: the fitted ensemble
//! - [`TrainingLogger`] / [`Verbosity`]: progress output

mod booster;
mod config;
mod dataset;
mod error;
mod logger;
mod tree;

pub use booster::{BoosterParams, GradientBooster};
pub use config::TrainerConfig;
pub use dataset::{FeatureKind, FeatureMatrix};
pub use error::TrainingError;
pub use logger::{TrainingLogger, Verbosity};
pub use tree::{Forest, Node, SplitKind, Tree};
