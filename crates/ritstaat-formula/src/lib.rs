//! # ritstaat-formula
//!
//! Formula engine for ritstaat templates.
//!
//! This crate provides:
//! - Tokenizing and parsing (text → AST, shunting-yard)
//! - Numeric evaluation (AST → number) for live preview
//! - Translation (AST → spreadsheet formula) for export
//! - Built-in spreadsheet-style functions
//! - Template dependency checks
//!
//! Both evaluation and translation walk the same AST, so a formula
//! references the same columns in preview and in the exported workbook.
//!
//! ## Example
//!
//! ```rust
//! use ritstaat_formula::{parse_formula, evaluate, EvaluationContext, FormulaLimits};
//!
//! let ast = parse_formula("=(eind_km-begin_km)*tarief_per_km", &FormulaLimits::default()).unwrap();
//! let ctx = EvaluationContext::new()
//!     .with_value("begin_km", 1100.0)
//!     .with_value("eind_km", 1250.0)
//!     .with_value("tarief_per_km", 0.2);
//!
//! assert_eq!(evaluate(&ast, &ctx), 30.0);
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod translator;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use dependency::{check_template, TemplateIssue};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_formula, get_function_registry, EvaluationContext};
pub use limits::FormulaLimits;
pub use parser::parse_formula;
pub use translator::{translate_formula_to_excel, translate_formula_with_limits, SystemVariableRefs};
