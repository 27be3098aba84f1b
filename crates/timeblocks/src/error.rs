//! Error types for the timeblocks library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for timeblocks operations.
#[derive(Debug, Error)]
pub enum TimeblocksError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required field is missing or cannot be parsed.
    ///
    /// `row` is the 1-based data row (header excluded), or `None` when the
    /// problem is with the header itself.
    #[error("{}", format_data_format(.row, .column, .message))]
    DataFormat {
        row: Option<usize>,
        column: String,
        message: String,
    },

    /// Gap threshold is negative or not a finite number.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TimeblocksError {
    /// Data format error tied to a specific data row.
    pub fn at_row(row: usize, column: impl Into<String>, message: impl Into<String>) -> Self {
        TimeblocksError::DataFormat {
            row: Some(row),
            column: column.into(),
            message: message.into(),
        }
    }

    /// Data format error in the header row.
    pub fn in_header(column: impl Into<String>, message: impl Into<String>) -> Self {
        TimeblocksError::DataFormat {
            row: None,
            column: column.into(),
            message: message.into(),
        }
    }
}

fn format_data_format(row: &Option<usize>, column: &str, message: &str) -> String {
    match row {
        Some(row) => format!("Data format error at row {}, column '{}': {}", row, column, message),
        None => format!("Data format error in header, column '{}': {}", column, message),
    }
}

/// Result type alias for timeblocks operations.
pub type Result<T> = std::result::Result<T, TimeblocksError>;
