//! Formula parser
//!
//! A shunting-yard parser over the token list. Operators are reduced into AST
//! nodes as they are popped from the operator stack; function calls recurse
//! into their argument lists.
//!
//! The token cap applies per expression level: a function call counts as one
//! operand of the expression around it, and each argument gets its own budget.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::{tokenize, Token};
use crate::limits::FormulaLimits;

/// Parse a formula string into an AST
///
/// The formula must start with `=` (leading whitespace is not skipped) and
/// stay within `limits`.
///
/// # Example
/// ```rust
/// use ritstaat_formula::{parse_formula, FormulaLimits};
///
/// let limits = FormulaLimits::default();
/// let ast = parse_formula("=eind_tijd-begin_tijd", &limits).unwrap();
/// assert_eq!(ast.identifiers(), vec!["eind_tijd", "begin_tijd"]);
///
/// assert!(parse_formula("eind_tijd", &limits).is_err());
/// ```
pub fn parse_formula(formula: &str, limits: &FormulaLimits) -> FormulaResult<FormulaExpr> {
    let body = formula
        .strip_prefix('=')
        .ok_or(FormulaError::MissingEquals)?;

    let length = formula.chars().count();
    if length > limits.max_formula_length {
        return Err(FormulaError::TooLong {
            length,
            max: limits.max_formula_length,
        });
    }

    // One character yields at most one token
    let tokens = tokenize(body, limits.max_formula_length);
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    parse_tokens(&tokens, 0, limits)
}

/// Parse a token slice at the given function nesting depth
fn parse_tokens(tokens: &[Token], depth: usize, limits: &FormulaLimits) -> FormulaResult<FormulaExpr> {
    let tokens = cap_level(tokens, limits.max_tokens);
    ShuntingYard::new(tokens, depth, limits).run()
}

/// Keep the first `max_tokens` tokens of one expression level
///
/// A call `NAME( ... )` with a closing paren counts as a single token; its
/// arguments are capped when they are parsed.
fn cap_level(tokens: &[Token], max_tokens: usize) -> &[Token] {
    let mut count = 0;
    let mut i = 0;

    while i < tokens.len() {
        if count == max_tokens {
            log::debug!(
                "token cap of {} reached, dropping {} tokens",
                max_tokens,
                tokens.len() - i
            );
            return &tokens[..i];
        }

        let is_call = matches!(tokens[i], Token::Identifier(_))
            && tokens.get(i + 1) == Some(&Token::LeftParen);
        i = if is_call {
            matching_paren(tokens, i + 1).map_or(i + 1, |close| close + 1)
        } else {
            i + 1
        };
        count += 1;
    }

    tokens
}

/// Entries on the operator stack
#[derive(Debug, Clone, Copy)]
enum StackEntry {
    Binary(BinaryOperator),
    Unary(UnaryOperator),
    LeftParen,
}

struct ShuntingYard<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    limits: &'t FormulaLimits,
    output: Vec<FormulaExpr>,
    operators: Vec<StackEntry>,
}

impl<'t> ShuntingYard<'t> {
    fn new(tokens: &'t [Token], depth: usize, limits: &'t FormulaLimits) -> Self {
        Self {
            tokens,
            pos: 0,
            depth,
            limits,
            output: Vec::new(),
            operators: Vec::new(),
        }
    }

    fn run(mut self) -> FormulaResult<FormulaExpr> {
        // True while the next token must start an operand
        let mut expect_operand = true;
        let tokens = self.tokens;

        while let Some(token) = tokens.get(self.pos) {
            match token {
                Token::Number(n) => {
                    self.require_operand_position(expect_operand, token)?;
                    self.output.push(FormulaExpr::Number(*n));
                    self.pos += 1;
                    expect_operand = false;
                }
                Token::Identifier(name) => {
                    self.require_operand_position(expect_operand, token)?;
                    if tokens.get(self.pos + 1) == Some(&Token::LeftParen) {
                        let call = self.parse_function_call(name)?;
                        self.output.push(call);
                    } else {
                        self.output.push(FormulaExpr::Identifier(name.clone()));
                        self.pos += 1;
                    }
                    expect_operand = false;
                }
                Token::Operator(op) if expect_operand => {
                    match op {
                        BinaryOperator::Subtract => {
                            self.operators.push(StackEntry::Unary(UnaryOperator::Negate))
                        }
                        // Unary plus is a no-op
                        BinaryOperator::Add => {}
                        _ => {
                            return Err(FormulaError::Parse(format!(
                                "Operator '{}' is missing its left operand",
                                op.symbol()
                            )))
                        }
                    }
                    self.pos += 1;
                }
                Token::Operator(op) => {
                    self.push_binary(*op)?;
                    self.pos += 1;
                    expect_operand = true;
                }
                Token::LeftParen => {
                    self.require_operand_position(expect_operand, token)?;
                    self.operators.push(StackEntry::LeftParen);
                    self.pos += 1;
                }
                Token::RightParen => {
                    if expect_operand {
                        return Err(FormulaError::Parse(
                            "Expected an operand before ')'".into(),
                        ));
                    }
                    self.close_group()?;
                    self.pos += 1;
                }
                Token::Comma => {
                    return Err(FormulaError::Parse(
                        "Unexpected ',' outside a function call".into(),
                    ));
                }
            }
        }

        if expect_operand {
            return Err(FormulaError::Parse("Incomplete expression".into()));
        }

        while let Some(entry) = self.operators.pop() {
            match entry {
                StackEntry::LeftParen => {
                    return Err(FormulaError::Parse("Unclosed '('".into()));
                }
                other => self.apply(other)?,
            }
        }

        let expr = self
            .output
            .pop()
            .ok_or_else(|| FormulaError::Parse("Empty expression".into()))?;
        if !self.output.is_empty() {
            return Err(FormulaError::Parse("Missing operator between operands".into()));
        }

        Ok(expr)
    }

    fn require_operand_position(&self, expect_operand: bool, token: &Token) -> FormulaResult<()> {
        if expect_operand {
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Missing operator before '{}'",
                token
            )))
        }
    }

    /// Pop everything that binds at least as tightly (left associativity),
    /// then push the new operator
    fn push_binary(&mut self, op: BinaryOperator) -> FormulaResult<()> {
        while let Some(&top) = self.operators.last() {
            let binds_tighter = match top {
                StackEntry::Binary(prev) => prev.precedence() >= op.precedence(),
                StackEntry::Unary(unary) => unary.precedence() >= op.precedence(),
                StackEntry::LeftParen => false,
            };
            if !binds_tighter {
                break;
            }
            self.operators.pop();
            self.apply(top)?;
        }

        self.operators.push(StackEntry::Binary(op));
        Ok(())
    }

    fn close_group(&mut self) -> FormulaResult<()> {
        loop {
            match self.operators.pop() {
                Some(StackEntry::LeftParen) => break,
                Some(entry) => self.apply(entry)?,
                None => return Err(FormulaError::Parse("Unmatched ')'".into())),
            }
        }

        let inner = self
            .output
            .pop()
            .ok_or_else(|| FormulaError::Parse("Empty parentheses".into()))?;
        self.output.push(FormulaExpr::Group(Box::new(inner)));
        Ok(())
    }

    /// Reduce one operator into an AST node
    fn apply(&mut self, entry: StackEntry) -> FormulaResult<()> {
        match entry {
            StackEntry::Binary(op) => {
                let right = self.pop_operand(op.symbol())?;
                let left = self.pop_operand(op.symbol())?;
                self.output.push(FormulaExpr::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            StackEntry::Unary(op) => {
                let operand = self.pop_operand("-")?;
                self.output.push(FormulaExpr::UnaryOp {
                    op,
                    operand: Box::new(operand),
                });
            }
            StackEntry::LeftParen => {
                return Err(FormulaError::Parse("Unclosed '('".into()));
            }
        }
        Ok(())
    }

    fn pop_operand(&mut self, symbol: &str) -> FormulaResult<FormulaExpr> {
        self.output
            .pop()
            .ok_or_else(|| FormulaError::Parse(format!("Missing operand for '{}'", symbol)))
    }

    /// Parse `NAME( ... )` starting at the name token
    ///
    /// Each argument is parsed on its own; an argument that does not parse is
    /// kept as [`FormulaExpr::Invalid`] and evaluates to 0. Exceeding the
    /// nesting limit fails the whole formula.
    fn parse_function_call(&mut self, name: &str) -> FormulaResult<FormulaExpr> {
        let tokens = self.tokens;
        let open = self.pos + 1;
        let close = matching_paren(tokens, open)
            .ok_or_else(|| FormulaError::Parse(format!("Unclosed '(' in call to {}", name)))?;

        let depth = self.depth + 1;
        if depth > self.limits.max_function_depth {
            return Err(FormulaError::TooDeep(self.limits.max_function_depth));
        }

        let inner = &tokens[open + 1..close];
        let mut args = Vec::new();
        if !inner.is_empty() {
            for segment in split_arguments(inner) {
                match parse_tokens(segment, depth, self.limits) {
                    Ok(arg) => args.push(arg),
                    Err(err @ FormulaError::TooDeep(_)) => return Err(err),
                    Err(err) => {
                        log::debug!("argument of {} does not parse: {}", name, err);
                        args.push(FormulaExpr::Invalid(segment.to_vec()));
                    }
                }
            }
        }

        self.pos = close + 1;
        Ok(FormulaExpr::Function {
            name: name.to_string(),
            args,
        })
    }
}

/// Index of the `)` matching the `(` at `open`
fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LeftParen => depth += 1,
            Token::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split an argument list at top-level commas
fn split_arguments(tokens: &[Token]) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LeftParen => depth += 1,
            Token::RightParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                segments.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&tokens[start..]);

    segments
}
