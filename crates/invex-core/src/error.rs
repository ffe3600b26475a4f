//! Error types for the invex-core library.
//!
//! Extraction itself never fails: unresolved fields are `None` and
//! inconsistencies are reported through `validation_passed`. These errors
//! only cover loading inputs and configuration.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// OCR document could not be loaded.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading OCR output.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Tesseract TSV could not be parsed.
    #[error("invalid Tesseract TSV: {0}")]
    InvalidTsv(String),

    /// A token carries an unusable bounding box.
    #[error("invalid bounding box for token {index}: {reason}")]
    InvalidBox { index: usize, reason: String },

    /// Input file kind is not supported.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

impl From<csv::Error> for DocumentError {
    fn from(err: csv::Error) -> Self {
        DocumentError::InvalidTsv(err.to_string())
    }
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
