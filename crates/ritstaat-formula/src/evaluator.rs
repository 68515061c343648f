//! Formula evaluator
//!
//! Walks a formula AST down to one number. Identifiers are looked up in an
//! [`EvaluationContext`]; nothing in this module fails, every degenerate case
//! has a numeric answer.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::functions::FunctionRegistry;
use crate::limits::FormulaLimits;
use crate::parser::parse_formula;
use ahash::AHashMap;
use ritstaat_core::{ColumnDefinition, FieldMap, Row, SystemVariables};
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The shared built-in function registry
pub fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Identifier values visible to a formula
///
/// Built fresh for each row evaluation. Later insertions shadow earlier ones,
/// so [`EvaluationContext::for_row`] seeds system variables first and lets
/// columns of the same name win.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    values: AHashMap<String, f64>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for one row: system variables, then every data column read
    /// through the field map
    ///
    /// Computed columns are added by the caller as they are evaluated.
    pub fn for_row(
        columns: &[ColumnDefinition],
        row: &Row,
        system_variables: &SystemVariables,
        field_map: &FieldMap,
    ) -> Self {
        let mut ctx = Self {
            values: AHashMap::with_capacity(columns.len() + system_variables.len()),
        };

        for (name, value) in system_variables.iter() {
            ctx.set(name, value);
        }
        for column in columns.iter().filter(|c| c.is_data()) {
            ctx.set(column.id.as_str(), field_map.resolve(&column.id, row));
        }

        ctx
    }

    /// Builder-style [`set`](Self::set)
    pub fn with_value<S: Into<String>>(mut self, id: S, value: f64) -> Self {
        self.set(id, value);
        self
    }

    /// Add already-computed column values
    pub fn with_computed<'a, I>(mut self, computed: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        for (id, value) in computed {
            self.set(id, value);
        }
        self
    }

    /// Bind an identifier, replacing any earlier value
    pub fn set<S: Into<String>>(&mut self, id: S, value: f64) {
        self.values.insert(id.into(), value);
    }

    /// Value bound to an identifier
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Check if an identifier is bound
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Number of bound identifiers
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluate a formula AST
///
/// Unknown identifiers read as 0, division by zero is 0 and comparisons yield
/// 1 or 0. Functions may still produce NaN or infinity (e.g. `SQRT(-1)`);
/// callers that need a finite result coerce it.
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> f64 {
    match expr {
        FormulaExpr::Number(n) => *n,

        FormulaExpr::Identifier(name) => ctx.get(name).unwrap_or_else(|| {
            log::debug!("unknown identifier '{}' evaluates to 0", name);
            0.0
        }),

        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate(left, ctx);
            let right = evaluate(right, ctx);
            apply_binary_op(*op, left, right)
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let value = evaluate(operand, ctx);
            match op {
                UnaryOperator::Negate => -value,
            }
        }

        FormulaExpr::Group(inner) => evaluate(inner, ctx),

        FormulaExpr::Function { name, args } => {
            let values: Vec<f64> = args.iter().map(|arg| evaluate(arg, ctx)).collect();
            call_function(name, &values)
        }

        FormulaExpr::Invalid(_) => 0.0,
    }
}

/// Parse and evaluate a formula in one step
///
/// Any formula that does not parse (no leading `=`, over the length limit,
/// malformed, nested too deeply) evaluates to 0.
///
/// # Example
/// ```rust
/// use ritstaat_formula::{evaluate_formula, EvaluationContext, FormulaLimits};
///
/// let ctx = EvaluationContext::new()
///     .with_value("begin_tijd", 7.5)
///     .with_value("eind_tijd", 16.0);
/// let limits = FormulaLimits::default();
///
/// assert_eq!(evaluate_formula("=eind_tijd-begin_tijd", &ctx, &limits), 8.5);
/// assert_eq!(evaluate_formula("=ROUND(3.456,2)", &ctx, &limits), 3.46);
/// assert_eq!(evaluate_formula("eind_tijd", &ctx, &limits), 0.0);
/// ```
pub fn evaluate_formula(formula: &str, ctx: &EvaluationContext, limits: &FormulaLimits) -> f64 {
    match parse_formula(formula, limits) {
        Ok(expr) => evaluate(&expr, ctx),
        Err(err) => {
            log::debug!("formula '{}' evaluates to 0: {}", formula, err);
            0.0
        }
    }
}

fn apply_binary_op(op: BinaryOperator, left: f64, right: f64) -> f64 {
    match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Divide => {
            if right == 0.0 {
                0.0
            } else {
                left / right
            }
        }
        BinaryOperator::Equal => bool_to_number(left == right),
        BinaryOperator::NotEqual => bool_to_number(left != right),
        BinaryOperator::LessThan => bool_to_number(left < right),
        BinaryOperator::LessEqual => bool_to_number(left <= right),
        BinaryOperator::GreaterThan => bool_to_number(left > right),
        BinaryOperator::GreaterEqual => bool_to_number(left >= right),
    }
}

fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Dispatch a function call by name
///
/// An unknown name is assumed to be a native spreadsheet function that only
/// the exported workbook can compute; in preview it passes its first argument
/// through.
fn call_function(name: &str, args: &[f64]) -> f64 {
    match get_function_registry().get(name) {
        Some(def) => (def.implementation)(args),
        None => {
            log::debug!("function {} is not built in, passing first argument through", name);
            args.first().copied().unwrap_or(0.0)
        }
    }
}
