//! Expression parser
//!
//! Tokenizes normalized formula text (numeric literals, operators and
//! parentheses only) and builds an [`Expr`] tree by recursive descent.
//!
//! Precedence, lowest to highest:
//! 1. Addition/Subtraction: `+`, `-`
//! 2. Multiplication/Division: `*`, `/`
//! 3. Exponentiation: `^`
//! 4. Unary sign: `-`, `+`
//! 5. Primary: literals, parentheses
//!
//! Every binary level is left-associative, so `2^3^2` is `(2^3)^2`. A sign
//! binds tighter than `^`: `-2^2` is `(-2)^2`, which keeps substituted
//! negative values intact (`a^2` with `a = -3` is `9`).

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::options::EvaluationOptions;

/// Parse normalized expression text into an expression tree
///
/// # Example
/// ```rust
/// use latex_calc_formula::parse_expression;
///
/// let ast = parse_expression("2+3*4").unwrap();
/// let ast = parse_expression("(1.5-2)^2").unwrap();
/// ```
pub fn parse_expression(text: &str) -> FormulaResult<Expr> {
    parse_with_options(text, &EvaluationOptions::default())
}

/// Parse with the nesting and tree depth limits of `options`
pub(crate) fn parse_with_options(
    text: &str,
    options: &EvaluationOptions,
) -> FormulaResult<Expr> {
    let mut parser = ExpressionParser::new(text, options.max_depth, options.max_tree_depth)?;
    let Subtree { expr, .. } = parser.parse_additive()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::malformed(
            text,
            format!("unexpected {} after expression", parser.current_token()),
        ));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Caret => f.write_str("'^'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of expression"),
        }
    }
}

/// A parsed expression with the depth of its tree
struct Subtree {
    expr: Expr,
    height: usize,
}

impl Subtree {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}

struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    depth: usize,
    max_depth: usize,
    max_tree_depth: usize,
}

impl<'a> ExpressionParser<'a> {
    fn new(input: &'a str, max_depth: usize, max_tree_depth: usize) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            depth: 0,
            max_depth,
            max_tree_depth,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() => return self.scan_number(),
            other => {
                return Err(FormulaError::malformed(
                    self.input,
                    format!("unexpected character '{}' at position {}", other, self.pos),
                ))
            }
        };

        self.advance();
        Ok(token)
    }

    /// Digits, optionally followed by `.` and at least one digit
    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            let fraction_start = self.pos;
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
            if self.pos == fraction_start {
                return Err(FormulaError::malformed(
                    self.input,
                    format!("missing digits after decimal point at position {}", start),
                ));
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map(Token::Number).map_err(|e| {
            FormulaError::malformed(self.input, format!("invalid number '{}': {}", num_str, e))
        })
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
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

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::malformed(
                self.input,
                format!("expected {}, got {}", expected, self.current_token()),
            ))
        }
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FormulaError::RecursionLimitExceeded {
                max: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Left-folded chains grow the tree without nesting, so the tree depth
    /// is bounded separately from `max_depth`.
    fn grow(&self, expr: Expr, height: usize) -> FormulaResult<Subtree> {
        if height > self.max_tree_depth {
            return Err(FormulaError::RecursionLimitExceeded {
                max: self.max_tree_depth,
            });
        }
        Ok(Subtree { expr, height })
    }

    fn fold(&self, op: BinaryOperator, left: Subtree, right: Subtree) -> FormulaResult<Subtree> {
        let height = 1 + left.height.max(right.height);
        self.grow(Expr::binary(op, left.expr, right.expr), height)
    }

    // === Expression parsing with precedence ===

    fn parse_additive(&mut self) -> FormulaResult<Subtree> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = self.fold(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Subtree> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_exponent()?;
            left = self.fold(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_exponent(&mut self) -> FormulaResult<Subtree> {
        let mut left = self.parse_unary()?;

        while matches!(self.current_token(), Token::Caret) {
            self.consume()?;
            let right = self.parse_unary()?;
            left = self.fold(BinaryOperator::Power, left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Subtree> {
        match self.current_token().clone() {
            Token::Minus => {
                self.consume()?;
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                let negated = Expr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand.expr),
                };
                self.grow(negated, operand.height + 1)
            }
            // Prefix plus (no-op)
            Token::Plus => {
                self.consume()?;
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                Ok(operand)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<Subtree> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Subtree::leaf(Expr::Number(n)))
            }
            Token::LeftParen => {
                self.consume()?;
                self.enter()?;
                let inner = self.parse_additive()?;
                self.leave();
                self.expect(&Token::RightParen)?;
                Ok(inner)
            }
            other => Err(FormulaError::malformed(
                self.input,
                format!("expected a number or '(', got {}", other),
            )),
        }
    }
}
