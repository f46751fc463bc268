//! Error types for abridge.

/// Errors that can occur during document reduction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Embedding provider failure (no usable model, or the model rejected input).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Unrecognized summary-length input.
    #[error("invalid summary length {0:?}: expected \"low\", \"moderate\", \"high\", or a number")]
    InvalidSummaryLength(String),

    /// Clustering was requested over an empty chunk list.
    #[error("cannot cluster an empty chunk list")]
    NoChunks,

    /// The requested or searched cluster count is infeasible for the input.
    #[error("invalid cluster count {k} for {points} points")]
    InvalidClusterCount {
        /// The cluster count that was requested (or the search lower bound).
        k: usize,
        /// The number of points available.
        points: usize,
    },

    /// Embedding vectors with inconsistent dimensions within one run.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The dimension of the first vector seen.
        expected: usize,
        /// The offending dimension.
        got: usize,
    },
}

/// Result type for abridge operations.
pub type Result<T> = std::result::Result<T, Error>;
