//! # ritstaat-core
//!
//! Core data structures for the ritstaat template formula engine.
//!
//! This crate provides the types the engine is fed with:
//! - [`ColumnDefinition`] - An ordered template column, data or computed
//! - [`Row`] and [`RawValue`] - One line of source data
//! - [`FieldMap`] - Which row property a data column reads
//! - [`SystemVariables`] - Named scalars such as the hourly rate
//! - [`ColumnIndex`] and [`CellRef`] - Column positions and A1-style references
//!
//! ## Example
//!
//! ```rust
//! use ritstaat_core::{ColumnDefinition, ColumnIndex, Row, FieldMap};
//!
//! let columns = vec![
//!     ColumnDefinition::data("begin_km"),
//!     ColumnDefinition::data("eind_km"),
//!     ColumnDefinition::computed("km", "=eind_km-begin_km"),
//! ];
//!
//! let index = ColumnIndex::new(&columns);
//! assert_eq!(index.letters("km").as_deref(), Some("C"));
//!
//! let row = Row::new().with("end_km", 410.0);
//! assert_eq!(FieldMap::default().resolve("eind_km", &row), 410.0);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod row;
pub mod variables;

// Re-exports for convenience
pub use cell::{column_to_letters, letters_to_column, CellRef, RawValue};
pub use column::{ColumnDefinition, ColumnIndex, ColumnKind};
pub use error::{Error, Result};
pub use row::{FieldMap, Row};
pub use variables::SystemVariables;

/// Maximum number of rows in a worksheet (spreadsheet limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (spreadsheet limit)
pub const MAX_COLS: u32 = 16_384;
