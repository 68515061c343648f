//! Prelude module - common imports for ritstaat users
//!
//! ```rust
//! use ritstaat::prelude::*;
//! ```

pub use crate::{
    // Template types
    ColumnDefinition,
    ColumnKind,
    // Row types
    FieldMap,
    RawValue,
    Row,
    SystemVariables,

    // Calculation types
    CalculationOptions,
    CalculationStats,
    ComputedValues,
    RowCalculator,

    // Export types
    export_row,
    CellRef,
    ExportedFormula,
    RowExport,
    SystemVariableRefs,

    // Formula types
    check_template,
    FormulaLimits,
    TemplateIssue,
};
