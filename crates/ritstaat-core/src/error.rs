//! Error types for ritstaat-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ritstaat-core
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid cell reference format
    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),

    /// Column position out of bounds
    #[error("Column position {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u32),

    /// Two column definitions share the same id
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),
}
