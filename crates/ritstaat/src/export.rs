//! Export planning
//!
//! Turns the computed columns of a template into spreadsheet formulas for one
//! worksheet row. The workbook writer (not part of this crate) puts `=` plus
//! the formula body into each target cell and the system variable values into
//! the cells named by the [`SystemVariableRefs`].

use ritstaat_core::{CellRef, ColumnDefinition, ColumnIndex};
use ritstaat_formula::{
    parse_formula, translate_formula_with_limits, FormulaLimits, SystemVariableRefs,
};

/// Spreadsheet formula of one computed column on one row
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExportedFormula {
    /// Column id
    pub column: String,
    /// Target cell
    pub cell: CellRef,
    /// Formula body, without the leading `=`
    pub formula: String,
}

impl ExportedFormula {
    /// Text to write into the cell
    pub fn cell_formula(&self) -> String {
        format!("={}", self.formula)
    }
}

/// Export plan for one worksheet row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowExport {
    /// One entry per computed column, in declaration order
    pub formulas: Vec<ExportedFormula>,
    /// The system variable references the formulas use
    pub system_variable_refs: SystemVariableRefs,
}

/// Plan the spreadsheet formulas of every computed column on `row_number`
///
/// Columns are placed in declaration order starting at column `A`.
///
/// # Example
/// ```rust
/// use ritstaat::prelude::*;
///
/// let columns = vec![
///     ColumnDefinition::data("begin_tijd"),
///     ColumnDefinition::data("eind_tijd"),
///     ColumnDefinition::computed("bedrag", "=(eind_tijd-begin_tijd)*tarief_per_uur"),
/// ];
/// let refs = SystemVariableRefs::stacked(["tarief_per_uur", "tarief_per_km"], 15, 5);
///
/// let export = export_row(&columns, 7, &refs, &FormulaLimits::default());
/// assert_eq!(export.formulas[0].cell.to_string(), "C7");
/// assert_eq!(export.formulas[0].cell_formula(), "=(B7-A7)*$O$5");
/// assert_eq!(export.system_variable_refs.len(), 1);
/// ```
pub fn export_row(
    columns: &[ColumnDefinition],
    row_number: u32,
    refs: &SystemVariableRefs,
    limits: &FormulaLimits,
) -> RowExport {
    let index = ColumnIndex::new(columns);
    let mut export = RowExport::default();

    for (i, column) in columns.iter().enumerate() {
        if !column.is_computed() {
            continue;
        }

        let formula = match column.formula.as_deref() {
            Some(formula) => {
                collect_used_refs(formula, &index, refs, limits, &mut export.system_variable_refs);
                translate_formula_with_limits(formula, &index, row_number, refs, limits)
            }
            None => "0".to_string(),
        };

        export.formulas.push(ExportedFormula {
            column: column.id.clone(),
            cell: CellRef::new(i as u32 + 1, row_number),
            formula,
        });
    }

    export
}

/// Plan `count` consecutive rows starting at `first_row`
pub fn export_rows(
    columns: &[ColumnDefinition],
    first_row: u32,
    count: u32,
    refs: &SystemVariableRefs,
    limits: &FormulaLimits,
) -> Vec<RowExport> {
    (first_row..first_row.saturating_add(count))
        .map(|row| export_row(columns, row, refs, limits))
        .collect()
}

/// Record the system variable references a formula reads
fn collect_used_refs(
    formula: &str,
    index: &ColumnIndex,
    refs: &SystemVariableRefs,
    limits: &FormulaLimits,
    used: &mut SystemVariableRefs,
) {
    let Ok(expr) = parse_formula(formula, limits) else {
        return;
    };

    for name in expr.identifiers() {
        if index.contains(name) {
            continue;
        }
        if let Some(reference) = refs.get(name) {
            used.insert(name, reference);
        }
    }
}
