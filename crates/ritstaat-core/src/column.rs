//! Template column types

use crate::cell::{column_to_letters, CellRef};
use crate::error::{Error, Result};
use ahash::AHashMap;

/// How a template column gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnKind {
    /// Read directly from the row
    Data,
    /// Produced by evaluating the column's formula
    #[cfg_attr(feature = "serde", serde(alias = "berekend"))]
    Computed,
}

/// One column of a spreadsheet template
///
/// Definitions are kept in a sequence and the order matters: a computed
/// column may only reference columns declared before it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDefinition {
    /// Stable identifier referenced by formulas (e.g. `eind_tijd`)
    pub id: String,
    /// Data or computed
    pub kind: ColumnKind,
    /// Formula text starting with `=` (computed columns only)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub formula: Option<String>,
}

impl ColumnDefinition {
    /// Create a data column
    pub fn data<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            kind: ColumnKind::Data,
            formula: None,
        }
    }

    /// Create a computed column
    pub fn computed<S: Into<String>, F: Into<String>>(id: S, formula: F) -> Self {
        Self {
            id: id.into(),
            kind: ColumnKind::Computed,
            formula: Some(formula.into()),
        }
    }

    /// Check if this column is computed
    pub fn is_computed(&self) -> bool {
        self.kind == ColumnKind::Computed
    }

    /// Check if this column is read from the row
    pub fn is_data(&self) -> bool {
        self.kind == ColumnKind::Data
    }
}

/// Maps column ids to their 1-based position in the template
///
/// Positions follow declaration order, so the first column is `A`.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: AHashMap<String, u32>,
}

impl ColumnIndex {
    /// Build the index from a column sequence
    ///
    /// If an id occurs twice, the first occurrence keeps its position.
    pub fn new(columns: &[ColumnDefinition]) -> Self {
        let mut positions = AHashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            positions.entry(column.id.clone()).or_insert(i as u32 + 1);
        }
        Self { positions }
    }

    /// Build the index, rejecting duplicate ids
    pub fn try_new(columns: &[ColumnDefinition]) -> Result<Self> {
        let mut positions = AHashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if positions.insert(column.id.clone(), i as u32 + 1).is_some() {
                return Err(Error::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self { positions })
    }

    /// Position of a column (1-based)
    pub fn position(&self, id: &str) -> Option<u32> {
        self.positions.get(id).copied()
    }

    /// Column letters of a column (`A`, `B`, ... `AA`)
    pub fn letters(&self, id: &str) -> Option<String> {
        self.position(id).map(column_to_letters)
    }

    /// Relative cell reference of a column on the given row
    pub fn cell_ref(&self, id: &str, row: u32) -> Option<CellRef> {
        self.position(id).map(|column| CellRef::new(column, row))
    }

    /// Check if the index knows a column
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of indexed columns
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trip_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::data("ritnummer"),
            ColumnDefinition::data("datum"),
            ColumnDefinition::data("chauffeur"),
            ColumnDefinition::data("pauze"),
            ColumnDefinition::data("correctie"),
            ColumnDefinition::data("begin_tijd"),
            ColumnDefinition::data("eind_tijd"),
            ColumnDefinition::computed("uren", "=eind_tijd-begin_tijd-pauze"),
        ]
    }

    #[test]
    fn test_positions_follow_declaration_order() {
        let index = ColumnIndex::new(&trip_columns());
        assert_eq!(index.len(), 8);
        assert_eq!(index.position("ritnummer"), Some(1));
        assert_eq!(index.position("begin_tijd"), Some(6));
        assert_eq!(index.position("eind_tijd"), Some(7));
        assert_eq!(index.position("onbekend"), None);
    }

    #[test]
    fn test_letters_and_cell_refs() {
        let index = ColumnIndex::new(&trip_columns());
        assert_eq!(index.letters("eind_tijd").as_deref(), Some("G"));
        assert_eq!(
            index.cell_ref("begin_tijd", 7).map(|c| c.to_string()),
            Some("F7".to_string())
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let mut columns = trip_columns();
        columns.push(ColumnDefinition::data("pauze"));

        let index = ColumnIndex::new(&columns);
        assert_eq!(index.position("pauze"), Some(4));

        assert_eq!(
            ColumnIndex::try_new(&columns).unwrap_err(),
            Error::DuplicateColumn("pauze".into())
        );
    }

    #[test]
    fn test_column_kinds() {
        let column = ColumnDefinition::computed("km", "=eind_km-begin_km");
        assert!(column.is_computed());
        assert!(!column.is_data());
        assert_eq!(column.formula.as_deref(), Some("=eind_km-begin_km"));

        let column = ColumnDefinition::data("begin_km");
        assert!(column.is_data());
        assert_eq!(column.formula, None);
    }
}
