//! Validate → normalize → evaluate pipeline

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::evaluate_expression;
use crate::normalizer::{normalize, strip_whitespace};
use crate::options::EvaluationOptions;
use crate::validator::{check_parentheses, validate};
use crate::variables::VariableBindings;

/// Evaluate a formula with default options
///
/// # Example
/// ```rust
/// use latex_calc_formula::{evaluate, VariableBindings};
///
/// let bindings = VariableBindings::from_values([('a', 3.0)]).unwrap();
/// assert_eq!(evaluate("2a + 1", &bindings).unwrap(), 7.0);
/// ```
pub fn evaluate(formula: &str, bindings: &VariableBindings) -> FormulaResult<f64> {
    Calculator::default().evaluate(formula, bindings)
}

/// Formula calculator with fixed [`EvaluationOptions`]
///
/// Holds no state besides its options; every call is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calculator {
    options: EvaluationOptions,
}

impl Calculator {
    pub fn new(options: EvaluationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Run the length limit and the validator
    ///
    /// Parenthesis balance is checked first, so an unbalanced formula is
    /// reported as such at any length.
    pub fn validate(&self, formula: &str) -> FormulaResult<()> {
        let stripped: Vec<char> = strip_whitespace(formula).chars().collect();
        check_parentheses(&stripped)?;
        self.check_length(stripped.len())?;
        validate(formula)
    }

    /// Validate, then produce the normalized numeric expression text
    pub fn normalize(&self, formula: &str, bindings: &VariableBindings) -> FormulaResult<String> {
        self.validate(formula)?;
        let normalized = normalize(formula, bindings)?;
        log::debug!("normalized '{}' to '{}'", formula, normalized);
        Ok(normalized)
    }

    /// Validate, normalize and evaluate a formula
    pub fn evaluate(&self, formula: &str, bindings: &VariableBindings) -> FormulaResult<f64> {
        let normalized = self.normalize(formula, bindings)?;
        let value = evaluate_expression(&normalized, &self.options);
        if let Err(e) = &value {
            log::debug!("evaluation of '{}' failed: {}", formula, e);
        }
        value
    }

    fn check_length(&self, len: usize) -> FormulaResult<()> {
        if len > self.options.max_formula_len {
            return Err(FormulaError::InputTooLarge {
                len,
                max: self.options.max_formula_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaErrorKind;
    use crate::options::NonFinitePolicy;

    fn vars(values: &[(char, f64)]) -> VariableBindings {
        VariableBindings::from_values(values.iter().copied()).unwrap()
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(evaluate("2a", &vars(&[('a', 3.0)])).unwrap(), 6.0);
        assert_eq!(evaluate("ab", &vars(&[('a', 2.0), ('b', 5.0)])).unwrap(), 10.0);
        assert_eq!(evaluate("(a)(b)", &vars(&[('a', 2.0), ('b', 3.0)])).unwrap(), 6.0);
    }

    #[test]
    fn test_sign_collapsing() {
        let empty = VariableBindings::new();
        assert_eq!(evaluate("5--3", &empty).unwrap(), 8.0);
        assert_eq!(evaluate("5+-3", &empty).unwrap(), 2.0);
        assert_eq!(evaluate("-(-(4))", &empty).unwrap(), 4.0);
    }

    #[test]
    fn test_negative_binding() {
        let bindings = vars(&[('a', -3.0), ('c', 10.0)]);
        assert_eq!(evaluate("c-a^2", &bindings).unwrap(), 1.0);
        assert_eq!(evaluate("c-a", &bindings).unwrap(), 13.0);
        assert_eq!(evaluate("2a", &bindings).unwrap(), -6.0);
    }

    #[test]
    fn test_validation_runs_before_substitution() {
        // 'q' is unbound, but the trailing operator is reported first
        let err = evaluate("q+", &VariableBindings::new()).unwrap_err();
        assert_eq!(err, FormulaError::TrailingOperator);
    }

    #[test]
    fn test_undefined_variable_never_defaults_to_zero() {
        let err = evaluate("a + b", &vars(&[('a', 1.0)])).unwrap_err();
        assert_eq!(err, FormulaError::UndefinedVariable { name: 'b' });
    }

    #[test]
    fn test_input_too_large() {
        let calculator = Calculator::new(EvaluationOptions {
            max_formula_len: 5,
            ..Default::default()
        });
        assert_eq!(calculator.evaluate("1 + 2 + 3", &VariableBindings::new()).unwrap(), 6.0);
        assert_eq!(
            calculator.evaluate("1+2+3+4", &VariableBindings::new()),
            Err(FormulaError::InputTooLarge { len: 7, max: 5 })
        );
    }

    #[test]
    fn test_unbalanced_parentheses_win_over_length_limit() {
        let formula = format!("({}1", "1+".repeat(2100));
        assert_eq!(
            evaluate(&formula, &VariableBindings::new()),
            Err(FormulaError::MismatchedParentheses)
        );

        let balanced = format!("({}1)", "1+".repeat(2100));
        assert_eq!(
            evaluate(&balanced, &VariableBindings::new()),
            Err(FormulaError::InputTooLarge { len: 4203, max: 4096 })
        );
    }

    #[test]
    fn test_raised_length_limit_keeps_tree_depth_bounded() {
        let calculator = Calculator::new(EvaluationOptions {
            max_formula_len: 2_000_000,
            ..Default::default()
        });
        let chain = format!("{}1", "1^".repeat(400_000));
        assert_eq!(
            calculator.evaluate(&chain, &VariableBindings::new()),
            Err(FormulaError::RecursionLimitExceeded { max: 4096 })
        );
    }

    #[test]
    fn test_recursion_limit() {
        let calculator = Calculator::new(EvaluationOptions {
            max_depth: 3,
            ..Default::default()
        });
        let err = calculator
            .evaluate("((((1))))", &VariableBindings::new())
            .unwrap_err();
        assert_eq!(err.kind(), FormulaErrorKind::RecursionLimitExceeded);
    }

    #[test]
    fn test_division_by_zero_policy() {
        let empty = VariableBindings::new();
        assert!(matches!(
            evaluate("1/0", &empty),
            Err(FormulaError::DomainError { .. })
        ));

        let calculator = Calculator::new(EvaluationOptions {
            non_finite: NonFinitePolicy::Propagate,
            ..Default::default()
        });
        assert_eq!(calculator.evaluate("1/0", &empty).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_empty_formula_is_malformed() {
        let err = evaluate("   ", &VariableBindings::new()).unwrap_err();
        assert_eq!(err.kind(), FormulaErrorKind::MalformedExpression);
    }
}
