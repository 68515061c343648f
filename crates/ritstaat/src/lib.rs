//! # ritstaat
//!
//! A spreadsheet-template formula engine.
//!
//! Templates are ordered columns, either read from a data row or computed by a
//! small formula language (`=eind_tijd-begin_tijd`, `=ROUND(km*tarief_per_km, 2)`).
//! From one template this crate produces:
//!
//! - Live preview values for a row ([`RowCalculator`])
//! - Spreadsheet-native formulas for an exported workbook ([`export_row`])
//! - Diagnostics for template editors ([`check_template`])
//!
//! Nothing here fails on bad input: malformed formulas, self-references and
//! numeric degeneracies all come out as 0, and every computed value is finite.
//!
//! ## Example
//!
//! ```rust
//! use ritstaat::prelude::*;
//!
//! let columns = vec![
//!     ColumnDefinition::data("begin_km"),
//!     ColumnDefinition::data("eind_km"),
//!     ColumnDefinition::computed("km", "=eind_km-begin_km"),
//!     ColumnDefinition::computed("vergoeding", "=km*tarief_per_km"),
//! ];
//! let vars = SystemVariables::new().with("tarief_per_km", 0.25);
//!
//! // Preview
//! let calculator = RowCalculator::new(columns.clone(), vars);
//! let row = Row::new().with("begin_km", 1200.0).with("end_km", "1320");
//! let values = calculator.calculate(&row);
//! assert_eq!(values.get("vergoeding"), Some(30.0));
//!
//! // Export
//! let refs = SystemVariableRefs::stacked(["tarief_per_km"], 15, 5);
//! let export = export_row(&columns, 7, &refs, &FormulaLimits::default());
//! assert_eq!(export.formulas[1].cell_formula(), "=C7*$O$5");
//! ```

pub mod calculation;
pub mod export;
pub mod prelude;

// Re-export calculation types
pub use calculation::{
    calculate_row, CalculationOptions, CalculationStats, ComputedValues, RowCalculator,
};

// Re-export export types
pub use export::{export_row, export_rows, ExportedFormula, RowExport};

// Re-export core types
pub use ritstaat_core::{
    column_to_letters, letters_to_column, variables, CellRef, ColumnDefinition, ColumnIndex,
    ColumnKind, Error, FieldMap, RawValue, Result, Row, SystemVariables, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use ritstaat_formula::{
    check_template, evaluate, evaluate_formula, parse_formula, translate_formula_to_excel,
    translate_formula_with_limits, EvaluationContext, FormulaError, FormulaExpr, FormulaLimits,
    FormulaResult, SystemVariableRefs, TemplateIssue,
};
