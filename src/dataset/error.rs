//! Dataset loading error types
//!
//! Every variant is fatal at startup: the dashboard cannot serve without data.

use thiserror::Error;

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// Network request for a remote dataset failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Remote source answered with a non-success status
    #[error("Fetch of {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV syntax error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A required field could not be parsed
    #[error("Line {line}: invalid value {value:?} in column {column}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Result type for dataset loading
pub type LoadResult<T> = Result<T, LoadError>;
