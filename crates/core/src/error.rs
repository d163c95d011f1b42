//! Error types for the metadata converter

use thiserror::Error;

use crate::sink::SinkError;

/// Result type alias for converter operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that abort the conversion of a single frame
///
/// None of these are raised for "nothing to emit": suppression is a policy
/// outcome, not a failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Document could not be rendered to a string
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The output sink rejected the message
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Converter configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConvertError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Per-field lookup failure on a [`Structure`](crate::structure::Structure)
///
/// Field failures are never fatal: the record that needed the field is
/// skipped and its siblings are still converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field is not present on the record
    #[error("field '{field}' is missing")]
    Missing { field: String },

    /// Field exists but holds a different type
    #[error("field '{field}' has type {actual}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub(crate) fn mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}
