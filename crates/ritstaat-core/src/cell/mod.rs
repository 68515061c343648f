//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellRef`] - A cell's location in a generated worksheet (e.g., "G7", "$O$5")
//! - [`RawValue`] - A raw value as supplied in a row

mod address;
mod value;

pub use address::{column_to_letters, letters_to_column, CellRef};
pub use value::RawValue;
