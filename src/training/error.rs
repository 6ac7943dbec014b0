//! Training errors.

/// Errors raised by the boosted-tree fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    /// Fit was invoked with no training rows.
    #[error("training data is empty")]
    EmptyTrainingData,

    /// Feature matrix and target vector disagree on sample count.
    #[error("feature matrix has {n_samples} samples but {n_targets} targets were given")]
    TargetMismatch { n_samples: usize, n_targets: usize },

    /// The boosting backend could not produce a model.
    #[error("boosted-tree fit failed: {0}")]
    FitFailed(String),
}
