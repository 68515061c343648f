//! Formula tokenizer
//!
//! Turns the body of a formula into a flat token list. The tokenizer never
//! fails: characters it does not recognize are skipped, and input beyond the
//! token cap is dropped.

use crate::ast::BinaryOperator;
use std::fmt;

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Decimal number, possibly carrying a leading minus
    Number(f64),
    /// Column id, system variable or function name
    Identifier(String),
    /// Arithmetic or comparison operator
    Operator(BinaryOperator),
    LeftParen,
    RightParen,
    /// Argument separator (`,` or `;`)
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(name) => f.write_str(name),
            Token::Operator(op) => f.write_str(op.symbol()),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// Tokenize an expression, keeping at most `max_tokens` tokens
///
/// # Example
/// ```rust
/// use ritstaat_formula::lexer::{tokenize, Token};
///
/// let tokens = tokenize("2*-3", 200);
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[2], Token::Number(-3.0));
/// ```
pub fn tokenize(input: &str, max_tokens: usize) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    while tokens.len() < max_tokens {
        match lexer.next_token(tokens.last()) {
            Some(token) => tokens.push(token),
            None => return tokens,
        }
    }

    lexer.skip_whitespace();
    if !lexer.is_at_end() {
        log::debug!(
            "token cap of {} reached, dropping '{}'",
            max_tokens,
            &input[lexer.pos..]
        );
    }

    tokens
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Scan the next token, skipping anything unrecognized. `previous` decides
    /// whether a '-' is a sign or a subtraction.
    fn next_token(&mut self, previous: Option<&Token>) -> Option<Token> {
        loop {
            self.skip_whitespace();
            let c = self.peek_char()?;

            match c {
                '+' => {
                    self.advance();
                    return Some(Token::Operator(BinaryOperator::Add));
                }
                '-' => {
                    let unary = matches!(
                        previous,
                        None | Some(Token::Operator(_))
                            | Some(Token::LeftParen)
                            | Some(Token::Comma)
                    );
                    if unary && self.number_starts_at(1) {
                        self.advance();
                        return Some(Token::Number(-self.scan_number()));
                    }
                    self.advance();
                    return Some(Token::Operator(BinaryOperator::Subtract));
                }
                '*' => {
                    self.advance();
                    return Some(Token::Operator(BinaryOperator::Multiply));
                }
                '/' => {
                    self.advance();
                    return Some(Token::Operator(BinaryOperator::Divide));
                }
                '(' => {
                    self.advance();
                    return Some(Token::LeftParen);
                }
                ')' => {
                    self.advance();
                    return Some(Token::RightParen);
                }
                ',' | ';' => {
                    self.advance();
                    return Some(Token::Comma);
                }
                '=' => {
                    // '==' and a bare '=' both mean equality
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                    }
                    return Some(Token::Operator(BinaryOperator::Equal));
                }
                '<' => {
                    self.advance();
                    let op = match self.peek_char() {
                        Some('=') => {
                            self.advance();
                            BinaryOperator::LessEqual
                        }
                        Some('>') => {
                            self.advance();
                            BinaryOperator::NotEqual
                        }
                        _ => BinaryOperator::LessThan,
                    };
                    return Some(Token::Operator(op));
                }
                '>' => {
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                        return Some(Token::Operator(BinaryOperator::GreaterEqual));
                    }
                    return Some(Token::Operator(BinaryOperator::GreaterThan));
                }
                _ => {}
            }

            if self.number_starts_at(0) {
                return Some(Token::Number(self.scan_number()));
            }

            if c.is_ascii_alphabetic() || c == '_' {
                return Some(self.scan_identifier());
            }

            // Unknown character
            self.advance();
        }
    }

    fn number_starts_at(&self, offset: usize) -> bool {
        match self.peek_char_at(offset) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self
                .peek_char_at(offset + 1)
                .map_or(false, |c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn scan_number(&mut self) -> f64 {
        let start = self.pos;

        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.input[start..self.pos].parse().unwrap_or(0.0)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        Token::Identifier(self.input[start..self.pos].to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(input: &str) -> Vec<Token> {
        tokenize(input, 200)
    }

    fn op(op: BinaryOperator) -> Token {
        Token::Operator(op)
    }

    #[test]
    fn test_numbers_and_arithmetic() {
        assert_eq!(
            lex("1 + 2.5*3/4 - .5"),
            vec![
                Token::Number(1.0),
                op(BinaryOperator::Add),
                Token::Number(2.5),
                op(BinaryOperator::Multiply),
                Token::Number(3.0),
                op(BinaryOperator::Divide),
                Token::Number(4.0),
                op(BinaryOperator::Subtract),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_signed_numbers() {
        assert_eq!(lex("-3"), vec![Token::Number(-3.0)]);
        assert_eq!(
            lex("2*-3"),
            vec![
                Token::Number(2.0),
                op(BinaryOperator::Multiply),
                Token::Number(-3.0)
            ]
        );
        assert_eq!(
            lex("(-1)"),
            vec![Token::LeftParen, Token::Number(-1.0), Token::RightParen]
        );
        // After an operand the minus is a subtraction
        assert_eq!(
            lex("5-3"),
            vec![
                Token::Number(5.0),
                op(BinaryOperator::Subtract),
                Token::Number(3.0)
            ]
        );
        // A minus before a name stays an operator
        assert_eq!(
            lex("-a"),
            vec![op(BinaryOperator::Subtract), Token::Identifier("a".into())]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            lex("== <> <= >= < > ="),
            vec![
                op(BinaryOperator::Equal),
                op(BinaryOperator::NotEqual),
                op(BinaryOperator::LessEqual),
                op(BinaryOperator::GreaterEqual),
                op(BinaryOperator::LessThan),
                op(BinaryOperator::GreaterThan),
                op(BinaryOperator::Equal),
            ]
        );
    }

    #[test]
    fn test_identifiers_and_calls() {
        assert_eq!(
            lex("ROUND(eind_km2; 2)"),
            vec![
                Token::Identifier("ROUND".into()),
                Token::LeftParen,
                Token::Identifier("eind_km2".into()),
                Token::Comma,
                Token::Number(2.0),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        assert_eq!(
            lex("3 # 4 € $"),
            vec![Token::Number(3.0), Token::Number(4.0)]
        );
        assert_eq!(lex("@@@"), vec![]);
    }

    #[test]
    fn test_token_cap_truncates() {
        let input = "1+".repeat(500);
        let tokens = tokenize(&input, 200);
        assert_eq!(tokens.len(), 200);
        assert_eq!(tokenize("1+2+3", 3).len(), 3);
    }

    #[test]
    fn test_display_round_trip_of_operators() {
        let rendered: Vec<String> = lex("a==b").iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["a", "=", "b"]);
    }
}
