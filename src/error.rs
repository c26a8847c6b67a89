//! Error types for the flight price predictor

use thiserror::Error;

/// Result type alias for flight price operations
pub type Result<T> = std::result::Result<T, FlightPriceError>;

/// Main error type for training and serving
#[derive(Error, Debug)]
pub enum FlightPriceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    NotFitted,

    #[error("Data error: {0}")]
    Data(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Inconsistent artifact: {0}")]
    InvalidArtifact(String),
}

/// Closed classification of errors, used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed caller input
    Validation,
    /// Persisted preprocessor or model could not be loaded
    ArtifactLoad,
    /// Request-derived features disagree with the fitted schema
    Transform,
    /// Anything else
    Unknown,
}

impl FlightPriceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlightPriceError::Validation(_) => ErrorKind::Validation,
            FlightPriceError::ArtifactLoad { .. } => ErrorKind::ArtifactLoad,
            FlightPriceError::Transform(_)
            | FlightPriceError::DimensionMismatch { .. }
            | FlightPriceError::FeatureNotFound(_)
            | FlightPriceError::NotFitted => ErrorKind::Transform,
            _ => ErrorKind::Unknown,
        }
    }

    pub(crate) fn artifact(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        FlightPriceError::ArtifactLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<polars::error::PolarsError> for FlightPriceError {
    fn from(err: polars::error::PolarsError) -> Self {
        FlightPriceError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for FlightPriceError {
    fn from(err: serde_json::Error) -> Self {
        FlightPriceError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for FlightPriceError {
    fn from(err: ndarray::ShapeError) -> Self {
        FlightPriceError::Transform(err.to_string())
    }
}
