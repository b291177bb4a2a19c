//! Error types for mask-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mask-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mask evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read or decode a mask image file.
    #[error("Image read failed: {path}: {reason}")]
    ImageRead {
        /// Path to the image that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Binary masks have different dimensions at metric computation time.
    ///
    /// Shape reconciliation makes this unreachable in the evaluation
    /// pipeline; hitting it indicates a caller skipped reconciliation.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected dimensions (width, height).
        expected: (usize, usize),
        /// Actual dimensions (width, height).
        actual: (usize, usize),
    },

    /// A dataset's prediction or ground-truth root directory does not exist.
    #[error("Missing directory: {path}")]
    MissingDirectory {
        /// The absent directory.
        path: PathBuf,
    },

    /// No datasets were configured for an evaluation run.
    #[error("No datasets configured")]
    NoDatasets,

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
