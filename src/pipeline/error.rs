//! Pipeline configuration errors.

use crate::data::FieldKind;
use crate::pipeline::Transform;

/// Errors raised while validating column specs or trainer
/// hyperparameters, before any data is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// The column set is empty; the feature vector would have nothing
    /// to pack.
    #[error("column set is empty: at least one feature column is required")]
    EmptyColumns,

    /// A column spec names a field outside the record schema.
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },

    /// The same column appears twice in the active column set.
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// A column spec pairs a transform with a column type it cannot
    /// apply to (categorical encoding on a numeric column, or
    /// normalization / pass-through on a text column).
    #[error("transform {transform:?} is not valid for {kind:?} column '{column}'")]
    InvalidTransform {
        column: String,
        transform: Transform,
        kind: FieldKind,
    },

    /// Learning rate must be positive.
    #[error("learning_rate must be > 0, got {0}")]
    InvalidLearningRate(f32),

    /// At least one boosting iteration is required.
    #[error("number_of_iterations must be >= 1")]
    InvalidIterations,

    /// A tree needs at least two leaves to split at all.
    #[error("number_of_leaves must be >= 2, got {0}")]
    InvalidLeafCount(u32),

    /// Minimum example counts must be positive.
    #[error("{field} must be >= 1")]
    InvalidMinimumCount { field: &'static str },

    /// Categorical split point budget must be positive.
    #[error("max_categorical_split_points must be >= 1")]
    InvalidSplitPointCount,

    /// Regularization and smoothing terms must be non-negative.
    #[error("{field} must be >= 0, got {value}")]
    InvalidRegularization { field: &'static str, value: f32 },
}
