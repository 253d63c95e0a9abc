use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error type returned by reading, exporting and converting functions.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input workbook (or JSON document) does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The workbook has no sheet with the requested name.
    #[error("sheet '{sheet}' not found (available: {available:?})")]
    SheetNotFound { sheet: String, available: Vec<String> },

    /// The file could not be read as a spreadsheet.
    #[error("spreadsheet parse error: {0}")]
    Parse(#[from] calamine::Error),

    /// The input is readable but does not have the expected shape.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The output file could not be created or written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O error not covered by a more specific variant.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
