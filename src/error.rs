//! Error types for the abstract-insights library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the abstract-insights application.
#[derive(Error, Debug)]
pub enum AbstractError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors reading the acceptance CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// External converter could not be found or launched
    #[error("Converter error: {0}")]
    Converter(String),

    /// Acceptance table is malformed or internally inconsistent
    #[error("Acceptance table error: {0}")]
    AcceptanceTable(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart rendering failed
    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// The joined table is empty, so no aggregate view can be computed
    #[error("Nothing to analyze: {0}")]
    EmptyCorpus(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with AbstractError
pub type Result<T> = std::result::Result<T, AbstractError>;

impl From<anyhow::Error> for AbstractError {
    fn from(err: anyhow::Error) -> Self {
        AbstractError::Other(err.to_string())
    }
}
