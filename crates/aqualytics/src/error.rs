//! Error types for the Aqualytics library.

use std::path::PathBuf;
use thiserror::Error;

use crate::race::SegmentField;

/// Main error type for Aqualytics operations.
#[derive(Debug, Error)]
pub enum AquaError {
    /// A field the resolved segment configuration marks as required is absent.
    #[error("Incomplete input: segment {segment} is missing required field '{field}'")]
    IncompleteInput { segment: usize, field: SegmentField },

    /// A single metric formula could not be computed.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// Metric key not present in the catalog.
    #[error("Unknown metric: '{0}'")]
    UnknownMetric(String),

    /// Caller-supplied value that cannot be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a derived metric could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DerivationError {
    /// The formula's denominator was zero (or negative).
    #[error("cannot derive '{metric}': {denominator} is not positive")]
    ZeroDenominator { metric: String, denominator: String },

    /// An input the formula needs was not reported.
    #[error("cannot derive '{metric}': '{input}' was not reported")]
    MissingValue { metric: String, input: String },

    /// No segment reported the values the formula averages.
    #[error("cannot derive '{metric}': no segment reported a value")]
    NoSamples { metric: String },
}

impl DerivationError {
    /// The metric key this failure applies to.
    pub fn metric(&self) -> &str {
        match self {
            DerivationError::ZeroDenominator { metric, .. }
            | DerivationError::MissingValue { metric, .. }
            | DerivationError::NoSamples { metric } => metric,
        }
    }
}

/// Result type alias for Aqualytics operations.
pub type Result<T> = std::result::Result<T, AquaError>;
