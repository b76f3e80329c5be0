//! Expression evaluator
//!
//! Reduces expression trees to numbers.

use crate::ast::{Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::options::{EvaluationOptions, NonFinitePolicy};
use crate::parser::parse_with_options;

/// Evaluate normalized expression text (numbers, operators, parentheses)
///
/// # Example
/// ```rust
/// use latex_calc_formula::{evaluate_expression, EvaluationOptions};
///
/// let value = evaluate_expression("2+3*4", &EvaluationOptions::default()).unwrap();
/// assert_eq!(value, 14.0);
/// ```
pub fn evaluate_expression(text: &str, options: &EvaluationOptions) -> FormulaResult<f64> {
    let ast = parse_with_options(text, options)?;
    let value = evaluate_tree(&ast, options)?;
    log::trace!("evaluated '{}' to {}", text, value);
    Ok(value)
}

/// Evaluate an expression tree
///
/// Recursion follows the tree; trees from [`parse_expression`](crate::parse_expression)
/// are bounded by `max_tree_depth`.
pub fn evaluate_tree(expr: &Expr, options: &EvaluationOptions) -> FormulaResult<f64> {
    match expr {
        // Literals too large for f64 parse to infinity
        Expr::Number(n) => check_finite(*n, options),
        Expr::UnaryOp {
            op: UnaryOperator::Negate,
            operand,
        } => Ok(-evaluate_tree(operand, options)?),
        Expr::BinaryOp { op, left, right } => {
            let left = evaluate_tree(left, options)?;
            let right = evaluate_tree(right, options)?;
            check_finite(op.apply(left, right), options)
        }
    }
}

fn check_finite(value: f64, options: &EvaluationOptions) -> FormulaResult<f64> {
    match options.non_finite {
        NonFinitePolicy::Reject if !value.is_finite() => Err(FormulaError::DomainError { value }),
        _ => Ok(value),
    }
}
