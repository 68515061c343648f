//! Row calculation
//!
//! Evaluates the computed columns of a template for one data row at a time.
//! Columns are processed strictly in declaration order and each result is fed
//! forward, so a computed column may reference any column declared before it.
//! There is no dependency graph: declaration order is the dependency order.
//!
//! # Example
//!
//! ```rust
//! use ritstaat::prelude::*;
//!
//! let columns = vec![
//!     ColumnDefinition::data("begin_tijd"),
//!     ColumnDefinition::data("eind_tijd"),
//!     ColumnDefinition::data("pauze"),
//!     ColumnDefinition::computed("uren", "=eind_tijd-begin_tijd-pauze"),
//!     ColumnDefinition::computed("bedrag", "=ROUND(uren*tarief_per_uur, 2)"),
//! ];
//! let vars = SystemVariables::new().with("tarief_per_uur", 42.5);
//! let calculator = RowCalculator::new(columns, vars);
//!
//! let row = Row::new()
//!     .with("begin_time", "07:30")
//!     .with("end_time", "16:00")
//!     .with("break", "0,5");
//!
//! let values = calculator.calculate(&row);
//! assert_eq!(values.get("uren"), Some(8.0));
//! assert_eq!(values.get("bedrag"), Some(340.0));
//! ```

use ritstaat_core::{ColumnDefinition, FieldMap, Row, SystemVariables};
use ritstaat_formula::{evaluate, parse_formula, EvaluationContext, FormulaExpr, FormulaLimits};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Options for row calculation
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalculationOptions {
    /// Static resource guards applied to every formula
    pub limits: FormulaLimits,
    /// Which row property each data column reads
    pub field_map: FieldMap,
}

/// Statistics from calculating one or more rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CalculationStats {
    /// Number of computed column values produced
    pub computed: usize,
    /// Formulas short-circuited to 0 because they reference their own column
    pub circular_references: usize,
    /// Formulas that are missing or do not parse, forced to 0
    pub invalid_formulas: usize,
    /// NaN or infinite results coerced to 0
    pub non_finite_coerced: usize,
}

impl AddAssign for CalculationStats {
    fn add_assign(&mut self, other: Self) {
        self.computed += other.computed;
        self.circular_references += other.circular_references;
        self.invalid_formulas += other.invalid_formulas;
        self.non_finite_coerced += other.non_finite_coerced;
    }
}

/// Computed column values of one row, in declaration order
///
/// Every value is finite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedValues {
    values: Vec<(String, f64)>,
}

impl ComputedValues {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Store a value; an id that is already present is overwritten in place
    fn insert(&mut self, id: &str, value: f64) {
        match self.values.iter_mut().find(|(existing, _)| existing == id) {
            Some(entry) => entry.1 = value,
            None => self.values.push((id.to_string(), value)),
        }
    }

    /// Value of a computed column
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, value)| *value)
    }

    /// Iterate over `(column id, value)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(id, value)| (id.as_str(), *value))
    }

    /// Number of computed values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no computed values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy into a map keyed by column id
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.values.iter().cloned().collect()
    }
}

/// Serialized as a JSON-style map in declaration order
#[cfg(feature = "serde")]
impl serde::Serialize for ComputedValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// What to do for one computed column, decided once per template
#[derive(Debug, Clone)]
enum ColumnPlan {
    Evaluate(FormulaExpr),
    SelfReference,
    Invalid,
}

#[derive(Debug, Clone)]
struct ComputedColumn {
    id: String,
    plan: ColumnPlan,
}

/// Evaluates the computed columns of a template row by row
///
/// Formulas are parsed once, when the calculator is built. Each row gets a
/// fresh evaluation scope, so rows are independent and the calculator can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct RowCalculator {
    columns: Vec<ColumnDefinition>,
    computed: Vec<ComputedColumn>,
    system_variables: SystemVariables,
    options: CalculationOptions,
}

impl RowCalculator {
    /// Create a calculator with default options
    pub fn new(columns: Vec<ColumnDefinition>, system_variables: SystemVariables) -> Self {
        Self::with_options(columns, system_variables, CalculationOptions::default())
    }

    /// Create a calculator with custom options
    pub fn with_options(
        columns: Vec<ColumnDefinition>,
        system_variables: SystemVariables,
        options: CalculationOptions,
    ) -> Self {
        let computed = columns
            .iter()
            .filter(|c| c.is_computed())
            .map(|c| ComputedColumn {
                id: c.id.clone(),
                plan: plan_column(c, &options.limits),
            })
            .collect();

        Self {
            columns,
            computed,
            system_variables,
            options,
        }
    }

    /// Template columns in declaration order
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// System variables visible to every formula
    pub fn system_variables(&self) -> &SystemVariables {
        &self.system_variables
    }

    /// Calculation options
    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    /// Calculate the computed columns of one row
    pub fn calculate(&self, row: &Row) -> ComputedValues {
        self.calculate_with_stats(row).0
    }

    /// Calculate many rows, each in its own scope
    pub fn calculate_rows(&self, rows: &[Row]) -> Vec<ComputedValues> {
        rows.iter().map(|row| self.calculate(row)).collect()
    }

    /// Calculate one row and report what had to be forced to 0
    pub fn calculate_with_stats(&self, row: &Row) -> (ComputedValues, CalculationStats) {
        let mut stats = CalculationStats::default();
        let mut values = ComputedValues::with_capacity(self.computed.len());
        let mut ctx = EvaluationContext::for_row(
            &self.columns,
            row,
            &self.system_variables,
            &self.options.field_map,
        );

        for column in &self.computed {
            let value = match &column.plan {
                ColumnPlan::Evaluate(expr) => evaluate(expr, &ctx),
                ColumnPlan::SelfReference => {
                    stats.circular_references += 1;
                    0.0
                }
                ColumnPlan::Invalid => {
                    stats.invalid_formulas += 1;
                    0.0
                }
            };

            let value = if value.is_finite() {
                value
            } else {
                log::debug!("column '{}' evaluated to {}, using 0", column.id, value);
                stats.non_finite_coerced += 1;
                0.0
            };

            ctx.set(column.id.as_str(), value);
            values.insert(&column.id, value);
            stats.computed += 1;
        }

        (values, stats)
    }
}

/// Compile one computed column
///
/// Self-reference is decided on the parsed identifiers, not on substring
/// containment: `=max_x+1` in column `x` is evaluated normally.
fn plan_column(column: &ColumnDefinition, limits: &FormulaLimits) -> ColumnPlan {
    let formula = match column.formula.as_deref() {
        Some(formula) => formula,
        None => {
            log::debug!("computed column '{}' has no formula", column.id);
            return ColumnPlan::Invalid;
        }
    };

    match parse_formula(formula, limits) {
        Ok(expr) if expr.references(&column.id) => {
            log::warn!("column '{}' references itself, forcing 0", column.id);
            ColumnPlan::SelfReference
        }
        Ok(expr) => ColumnPlan::Evaluate(expr),
        Err(err) => {
            log::debug!("column '{}' evaluates to 0: {}", column.id, err);
            ColumnPlan::Invalid
        }
    }
}

/// Calculate one row without keeping a calculator around
pub fn calculate_row(
    columns: &[ColumnDefinition],
    row: &Row,
    system_variables: &SystemVariables,
    options: &CalculationOptions,
) -> ComputedValues {
    RowCalculator::with_options(columns.to_vec(), system_variables.clone(), options.clone())
        .calculate(row)
}
