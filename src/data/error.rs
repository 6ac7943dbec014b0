//! Data-layer errors.

/// Errors raised while loading, selecting, or persisting listing data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Underlying file I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or schema mismatch (wrong header, bad field type).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A numeric field held a value that cannot be used for training.
    #[error("record {row}: field '{field}' is not a finite number")]
    NonFiniteField { row: usize, field: &'static str },

    /// Operation requires at least one record.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Model payload could not be encoded for persistence.
    #[error("model payload encode failed: {0}")]
    Encode(String),

    /// Persisted model payload could not be decoded.
    #[error("model payload decode failed: {0}")]
    Decode(String),
}
