//! Error types for the table crate.

use thiserror::Error;

/// Errors that can occur when loading rows or producing text from a view.
///
/// Engine operations themselves never fail on data; see
/// [`TableEngine`](crate::TableEngine) for how render failures propagate.
#[derive(Debug, Error)]
pub enum TableError {
    /// A JSON value that is not an object was offered as a row.
    #[error("row must be a JSON object, got {found}")]
    InvalidRow { found: &'static str },

    /// Row input was not valid JSON.
    #[error("invalid row JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV writer rejected a record.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// CSV output could not be flushed into the buffer.
    #[error("CSV export failed: {0}")]
    CsvFlush(String),

    /// CSV output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The highlight pattern could not be compiled.
    #[error("invalid highlight pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
