//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Unknown observation field name
    #[error("Unknown observation field: {0}")]
    UnknownField(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Invalid value for a symbol
    #[error("Invalid value for {symbol}: {reason}")]
    InvalidValue {
        /// Symbol that carried the value
        symbol: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The same symbol appeared twice in a holdings file
    #[error("Duplicate holding for {0}")]
    DuplicateHolding(String),
}
