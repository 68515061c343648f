//! Formula Abstract Syntax Tree types
//!
//! A formula is parsed once into this tree. Identifiers stay as leaf nodes, so
//! the numeric evaluator and the spreadsheet translator are two independent
//! walks over the same tree instead of two textual rewrites.

use crate::lexer::Token;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),
    /// Column id or system variable name
    Identifier(String),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
    /// Parenthesized expression, kept so export reproduces the author's grouping
    Group(Box<FormulaExpr>),

    /// Function call; the name is kept as written
    Function { name: String, args: Vec<FormulaExpr> },

    /// A function argument that failed to parse. Evaluates to 0; the tokens
    /// are kept for export.
    Invalid(Vec<Token>),
}

impl FormulaExpr {
    /// Identifiers referenced anywhere in the expression, in order of first
    /// appearance
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            FormulaExpr::Identifier(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.collect_identifiers(names);
                right.collect_identifiers(names);
            }
            FormulaExpr::UnaryOp { operand, .. } => operand.collect_identifiers(names),
            FormulaExpr::Group(inner) => inner.collect_identifiers(names),
            FormulaExpr::Function { args, .. } => {
                for arg in args {
                    arg.collect_identifiers(names);
                }
            }
            FormulaExpr::Invalid(tokens) => {
                for token in tokens {
                    if let Token::Identifier(name) = token {
                        if !names.contains(&name.as_str()) {
                            names.push(name);
                        }
                    }
                }
            }
            FormulaExpr::Number(_) => {}
        }
    }

    /// Check if the expression references the given identifier
    pub fn references(&self, id: &str) -> bool {
        self.identifiers().contains(&id)
    }

    /// Deepest nesting of function calls (0 when there are none)
    pub fn function_depth(&self) -> usize {
        match self {
            FormulaExpr::Number(_) | FormulaExpr::Identifier(_) | FormulaExpr::Invalid(_) => 0,
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.function_depth().max(right.function_depth())
            }
            FormulaExpr::UnaryOp { operand, .. } => operand.function_depth(),
            FormulaExpr::Group(inner) => inner.function_depth(),
            FormulaExpr::Function { args, .. } => {
                1 + args.iter().map(|a| a.function_depth()).max().unwrap_or(0)
            }
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl BinaryOperator {
    /// Binding strength: comparison < additive < multiplicative
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEqual => 1,
            BinaryOperator::Add | BinaryOperator::Subtract => 2,
            BinaryOperator::Multiply | BinaryOperator::Divide => 3,
        }
    }

    /// Check if this is a comparison operator
    pub fn is_comparison(self) -> bool {
        self.precedence() == 1
    }

    /// Spreadsheet spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

impl UnaryOperator {
    /// Prefix operators bind tighter than any binary operator
    pub fn precedence(self) -> u8 {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Box<FormulaExpr> {
        Box::new(FormulaExpr::Identifier(name.into()))
    }

    #[test]
    fn test_identifiers_in_order_without_duplicates() {
        let expr = FormulaExpr::BinaryOp {
            op: BinaryOperator::Multiply,
            left: Box::new(FormulaExpr::Group(Box::new(FormulaExpr::BinaryOp {
                op: BinaryOperator::Subtract,
                left: ident("eind_tijd"),
                right: ident("begin_tijd"),
            }))),
            right: Box::new(FormulaExpr::Function {
                name: "MAX".into(),
                args: vec![*ident("tarief_per_uur"), *ident("eind_tijd")],
            }),
        };

        assert_eq!(
            expr.identifiers(),
            vec!["eind_tijd", "begin_tijd", "tarief_per_uur"]
        );
        assert!(expr.references("begin_tijd"));
        assert!(!expr.references("begin"));
        assert_eq!(expr.function_depth(), 1);
    }

    #[test]
    fn test_operator_precedence_order() {
        assert!(BinaryOperator::Equal.precedence() < BinaryOperator::Add.precedence());
        assert!(BinaryOperator::Add.precedence() < BinaryOperator::Divide.precedence());
        assert!(BinaryOperator::Multiply.precedence() < UnaryOperator::Negate.precedence());
        assert!(BinaryOperator::LessEqual.is_comparison());
        assert!(!BinaryOperator::Subtract.is_comparison());
    }
}
