//! Formula validation
//!
//! Structural checks run on the raw formula before any rewriting. The checks
//! run in a fixed order and the first failure wins. Positions in errors are
//! character indices into the formula with whitespace removed.

use crate::error::{FormulaError, FormulaResult};
use crate::normalizer::strip_whitespace;

pub(crate) fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^')
}

pub(crate) fn is_additive(c: char) -> bool {
    matches!(c, '+' | '-')
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '(' || c == ')' || is_operator(c)
}

/// Validate a formula without evaluating it
///
/// Sign runs such as `5--3` or `2+-a` are accepted here; the normalizer
/// collapses them. Any adjacency involving `*`, `/` or `^` is rejected.
///
/// # Example
/// ```rust
/// use latex_calc_formula::{validate, FormulaError};
///
/// assert!(validate("2a + (b - 1)^2").is_ok());
/// assert_eq!(validate("(a+b"), Err(FormulaError::MismatchedParentheses));
/// assert_eq!(validate("a+"), Err(FormulaError::TrailingOperator));
/// ```
pub fn validate(formula: &str) -> FormulaResult<()> {
    let chars: Vec<char> = strip_whitespace(formula).chars().collect();

    check_parentheses(&chars)?;
    check_characters(&chars)?;
    check_consecutive_operators(&chars)?;
    check_trailing_operator(&chars)?;
    check_dangling_operators(&chars)?;
    check_operator_sequences(&chars)?;
    check_leading_operators(&chars)?;

    Ok(())
}

pub(crate) fn check_parentheses(chars: &[char]) -> FormulaResult<()> {
    let mut balance: usize = 0;
    for &c in chars {
        match c {
            '(' => balance += 1,
            ')' => {
                // Closing parenthesis without a matching opening one
                balance = balance
                    .checked_sub(1)
                    .ok_or(FormulaError::MismatchedParentheses)?;
            }
            _ => {}
        }
    }

    if balance != 0 {
        return Err(FormulaError::MismatchedParentheses);
    }
    Ok(())
}

fn check_characters(chars: &[char]) -> FormulaResult<()> {
    match chars.iter().position(|&c| !is_allowed(c)) {
        Some(position) => Err(FormulaError::InvalidCharacter {
            character: chars[position],
            position,
        }),
        None => Ok(()),
    }
}

fn check_consecutive_operators(chars: &[char]) -> FormulaResult<()> {
    for (position, pair) in chars.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        if is_operator(a) && is_operator(b) && !(is_additive(a) && is_additive(b)) {
            return Err(FormulaError::ConsecutiveOperators { position });
        }
    }
    Ok(())
}

fn check_trailing_operator(chars: &[char]) -> FormulaResult<()> {
    match chars.last() {
        Some(&c) if is_operator(c) => Err(FormulaError::TrailingOperator),
        _ => Ok(()),
    }
}

fn check_dangling_operators(chars: &[char]) -> FormulaResult<()> {
    for (position, pair) in chars.windows(2).enumerate() {
        if is_operator(pair[0]) && pair[1] == ')' {
            return Err(FormulaError::DanglingOperator { position });
        }
    }
    Ok(())
}

fn check_operator_sequences(chars: &[char]) -> FormulaResult<()> {
    let without_parens: Vec<(usize, char)> = chars
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, c)| c != '(' && c != ')')
        .collect();

    for pair in without_parens.windows(2) {
        let ((position, a), (_, b)) = (pair[0], pair[1]);
        if matches!(a, '*' | '/' | '^') && is_operator(b) {
            return Err(FormulaError::InvalidOperatorSequence { position });
        }
    }
    Ok(())
}

fn check_leading_operators(chars: &[char]) -> FormulaResult<()> {
    let mut previous: Option<char> = None;
    for (position, &c) in chars.iter().enumerate() {
        if matches!(c, '*' | '/' | '^') && matches!(previous, None | Some('(')) {
            return Err(FormulaError::LeadingOperator { position });
        }
        previous = Some(c);
    }
    Ok(())
}
