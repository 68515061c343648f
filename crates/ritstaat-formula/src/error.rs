//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while parsing a formula
///
/// These never escape the evaluation entry points, which turn every error into
/// the numeric default 0.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormulaError {
    /// Formula text does not start with '='
    #[error("Formula must start with '='")]
    MissingEquals,

    /// Formula exceeds the configured length
    #[error("Formula is {length} characters long (max: {max})")]
    TooLong { length: usize, max: usize },

    /// Nothing left to evaluate after tokenizing
    #[error("Empty expression")]
    Empty,

    /// Malformed expression
    #[error("Parse error: {0}")]
    Parse(String),

    /// Function calls nested deeper than allowed
    #[error("Function calls nested deeper than {0}")]
    TooDeep(usize),
}
