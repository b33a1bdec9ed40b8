//! Error types for the engine facade

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine and its file helpers
#[derive(Debug, Error)]
pub enum Error {
    /// Document model error
    #[error(transparent)]
    Core(#[from] tabula_core::Error),

    /// CSV error
    #[error(transparent)]
    Csv(#[from] tabula_csv::CsvError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document that parsed but does not describe a workbook
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
