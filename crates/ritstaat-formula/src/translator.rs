//! Spreadsheet formula translation
//!
//! Renders a parsed template formula as a spreadsheet-native formula body:
//! column ids become relative cell references on the target row and system
//! variables become the absolute references of the cells holding them.

use crate::ast::{FormulaExpr, UnaryOperator};
use crate::error::FormulaError;
use crate::evaluator::get_function_registry;
use crate::lexer::{tokenize, Token};
use crate::limits::FormulaLimits;
use crate::parser::parse_formula;
use ritstaat_core::{CellRef, ColumnIndex};
use std::collections::BTreeMap;

/// Absolute cell references of the system variables in an exported sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SystemVariableRefs {
    refs: BTreeMap<String, String>,
}

impl SystemVariableRefs {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay variables out top to bottom in one column, starting at `first_row`
    ///
    /// # Example
    /// ```rust
    /// use ritstaat_formula::SystemVariableRefs;
    ///
    /// // Column O, rows 5 and 6
    /// let refs = SystemVariableRefs::stacked(["tarief_per_uur", "tarief_per_km"], 15, 5);
    /// assert_eq!(refs.get("tarief_per_uur"), Some("$O$5"));
    /// assert_eq!(refs.get("tarief_per_km"), Some("$O$6"));
    /// ```
    pub fn stacked<I, S>(names: I, column: u32, first_row: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .zip(first_row..)
            .map(|(name, row)| (name.into(), CellRef::absolute(column, row).to_string()))
            .collect()
    }

    /// Builder-style insert
    pub fn with<N: Into<String>, R: Into<String>>(mut self, name: N, reference: R) -> Self {
        self.insert(name, reference);
        self
    }

    /// Set the reference of a variable
    pub fn insert<N: Into<String>, R: Into<String>>(&mut self, name: N, reference: R) {
        self.refs.insert(name.into(), reference.into());
    }

    /// Reference of a variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.refs.get(name).map(String::as_str)
    }

    /// Check if a variable has a reference
    pub fn contains(&self, name: &str) -> bool {
        self.refs.contains_key(name)
    }

    /// Iterate over `(name, reference)` in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.refs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Check if no variable has a reference
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

impl<N: Into<String>, R: Into<String>> FromIterator<(N, R)> for SystemVariableRefs {
    fn from_iter<I: IntoIterator<Item = (N, R)>>(iter: I) -> Self {
        let mut refs = SystemVariableRefs::new();
        for (name, reference) in iter {
            refs.insert(name, reference);
        }
        refs
    }
}

/// Translate a template formula into a spreadsheet formula body (no leading
/// `=`) for the given worksheet row, using the default limits
///
/// # Example
/// ```rust
/// use ritstaat_core::{ColumnDefinition, ColumnIndex};
/// use ritstaat_formula::{translate_formula_to_excel, SystemVariableRefs};
///
/// let columns: Vec<_> = ["a", "b", "c", "d", "e", "begin_tijd", "eind_tijd"]
///     .into_iter()
///     .map(ColumnDefinition::data)
///     .collect();
/// let index = ColumnIndex::new(&columns);
///
/// let body = translate_formula_to_excel("=eind_tijd-begin_tijd", &index, 7, &SystemVariableRefs::new());
/// assert_eq!(body, "G7-F7");
/// ```
pub fn translate_formula_to_excel(
    formula: &str,
    columns: &ColumnIndex,
    row: u32,
    system_refs: &SystemVariableRefs,
) -> String {
    translate_formula_with_limits(formula, columns, row, system_refs, &FormulaLimits::default())
}

/// Translate a template formula under explicit limits
///
/// Mirrors evaluation: a formula that would evaluate to 0 because it is
/// missing its `=`, too long or empty is exported as `0`. A malformed formula
/// is exported token by token with its identifiers substituted, leaving the
/// spreadsheet to report the error.
pub fn translate_formula_with_limits(
    formula: &str,
    columns: &ColumnIndex,
    row: u32,
    system_refs: &SystemVariableRefs,
    limits: &FormulaLimits,
) -> String {
    let translator = Translator {
        columns,
        row,
        system_refs,
    };

    match parse_formula(formula, limits) {
        Ok(expr) => translator.render(&expr),
        Err(err @ FormulaError::TooLong { .. }) => {
            log::warn!("formula exported as 0: {}", err);
            "0".to_string()
        }
        Err(err @ (FormulaError::MissingEquals | FormulaError::Empty)) => {
            log::debug!("formula '{}' exported as 0: {}", formula, err);
            "0".to_string()
        }
        Err(err) => {
            log::warn!("formula '{}' exported verbatim: {}", formula, err);
            let body = formula.strip_prefix('=').unwrap_or(formula);
            translator.render_tokens(&tokenize(body, limits.max_formula_length))
        }
    }
}

struct Translator<'a> {
    columns: &'a ColumnIndex,
    row: u32,
    system_refs: &'a SystemVariableRefs,
}

impl Translator<'_> {
    fn render(&self, expr: &FormulaExpr) -> String {
        let mut out = String::new();
        self.write_expr(expr, &mut out);
        out
    }

    fn write_expr(&self, expr: &FormulaExpr, out: &mut String) {
        match expr {
            FormulaExpr::Number(n) => out.push_str(&n.to_string()),
            FormulaExpr::Identifier(name) => out.push_str(&self.reference(name)),
            FormulaExpr::BinaryOp { op, left, right } => {
                self.write_expr(left, out);
                out.push_str(op.symbol());
                self.write_expr(right, out);
            }
            FormulaExpr::UnaryOp { op, operand } => {
                match op {
                    UnaryOperator::Negate => out.push('-'),
                }
                self.write_expr(operand, out);
            }
            FormulaExpr::Group(inner) => {
                out.push('(');
                self.write_expr(inner, out);
                out.push(')');
            }
            FormulaExpr::Function { name, args } => {
                out.push_str(&function_name(name));
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_expr(arg, out);
                }
                out.push(')');
            }
            FormulaExpr::Invalid(tokens) => out.push_str(&self.render_tokens(tokens)),
        }
    }

    fn render_tokens(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Identifier(name) => {
                    if tokens.get(i + 1) == Some(&Token::LeftParen) {
                        out.push_str(&function_name(name));
                    } else {
                        out.push_str(&self.reference(name));
                    }
                }
                other => out.push_str(&other.to_string()),
            }
        }
        out
    }

    /// Columns win over system variables; anything else is kept as written
    fn reference(&self, name: &str) -> String {
        if let Some(cell) = self.columns.cell_ref(name, self.row) {
            return cell.to_string();
        }
        match self.system_refs.get(name) {
            Some(reference) => reference.to_string(),
            None => name.to_string(),
        }
    }
}

/// Built-ins are written under their spreadsheet name; unknown functions are
/// assumed native and kept as written
fn function_name(name: &str) -> String {
    match get_function_registry().get(name) {
        Some(def) => def.export_name().to_string(),
        None => name.to_string(),
    }
}
