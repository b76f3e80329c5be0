//! End-to-end tests for the validate → normalize → evaluate pipeline.

use latex_calc_formula::{
    evaluate, evaluate_expression, Calculator, EvaluationOptions, FormulaError, FormulaErrorKind,
    VariableBindings,
};
use pretty_assertions::assert_eq;

fn vars(values: &[(char, f64)]) -> VariableBindings {
    VariableBindings::from_values(values.iter().copied()).unwrap()
}

fn eval(formula: &str) -> Result<f64, FormulaError> {
    evaluate(formula, &VariableBindings::new())
}

#[test]
fn test_operator_precedence() {
    let cases = [
        ("2+3*4", 14.0),
        ("(2+3)*4", 20.0),
        ("2^3+1", 9.0),
        ("2^(1+1)", 4.0),
        ("10/4*2", 5.0),
        ("1-2-3", -4.0),
        ("2*3+4*5", 26.0),
        ("((1+2)*(3+4))^2", 441.0),
        ("0.5*0.5", 0.25),
        ("-5+2", -3.0),
    ];
    for (formula, expected) in cases {
        assert_eq!(eval(formula).unwrap(), expected, "formula {:?}", formula);
    }
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(evaluate("2a", &vars(&[('a', 3.0)])).unwrap(), 6.0);
    assert_eq!(evaluate("ab", &vars(&[('a', 2.0), ('b', 5.0)])).unwrap(), 10.0);
    assert_eq!(evaluate("(a)(b)", &vars(&[('a', 2.0), ('b', 3.0)])).unwrap(), 6.0);
    assert_eq!(evaluate("2(3)", &VariableBindings::new()).unwrap(), 6.0);
    assert_eq!(evaluate("(2)(3)", &VariableBindings::new()).unwrap(), 6.0);
    assert_eq!(
        evaluate("3xy^2", &vars(&[('x', 2.0), ('y', 3.0)])).unwrap(),
        54.0
    );
}

#[test]
fn test_case_sensitive_variables() {
    let bindings = vars(&[('a', 1.0), ('A', 10.0)]);
    assert_eq!(evaluate("a + A", &bindings).unwrap(), 11.0);
}

#[test]
fn test_sign_collapsing() {
    assert_eq!(eval("5--3").unwrap(), eval("5+3").unwrap());
    assert_eq!(eval("5--3").unwrap(), 8.0);
    assert_eq!(eval("5-+-3").unwrap(), 8.0);
    assert_eq!(eval("(-(-2))*3").unwrap(), 6.0);
}

#[test]
fn test_error_classification() {
    let cases = [
        ("(1+2", FormulaErrorKind::MismatchedParentheses),
        ("1+2)", FormulaErrorKind::MismatchedParentheses),
        ("1 + 2 &", FormulaErrorKind::InvalidCharacter),
        ("2**3", FormulaErrorKind::ConsecutiveOperators),
        ("2*-3", FormulaErrorKind::ConsecutiveOperators),
        ("2*(-3)", FormulaErrorKind::InvalidOperatorSequence),
        ("1+", FormulaErrorKind::TrailingOperator),
        ("(1-)+2", FormulaErrorKind::DanglingOperator),
        ("/2", FormulaErrorKind::LeadingOperator),
        ("x + 1", FormulaErrorKind::UndefinedVariable),
        ("()", FormulaErrorKind::MalformedExpression),
        ("1.2.3", FormulaErrorKind::MalformedExpression),
        ("1/0", FormulaErrorKind::DomainError),
        ("(-8)^(1/3)", FormulaErrorKind::DomainError),
    ];
    for (formula, kind) in cases {
        let err = eval(formula).unwrap_err();
        assert_eq!(err.kind(), kind, "formula {:?}: {}", formula, err);
    }
}

#[test]
fn test_unbalanced_parentheses_win_over_everything() {
    for formula in ["(x", "(%", "(1+", ")*/", "((a)+b"] {
        assert_eq!(
            eval(formula),
            Err(FormulaError::MismatchedParentheses),
            "formula {:?}",
            formula
        );
    }
}

#[test]
fn test_error_context() {
    let err = eval("3 + y").unwrap_err();
    assert_eq!(err, FormulaError::UndefinedVariable { name: 'y' });
    assert_eq!(err.to_string(), "Variable y is not defined.");

    match eval("2..5").unwrap_err() {
        FormulaError::MalformedExpression { expression, .. } => assert_eq!(expression, "2..5"),
        other => panic!("Expected MalformedExpression, got {:?}", other),
    }
}

#[test]
fn test_repeated_evaluation_is_stable() {
    let calculator = Calculator::default();
    let bindings = vars(&[('r', 2.0)]);
    let first = calculator.evaluate("3.14159r^2", &bindings).unwrap();
    let second = calculator.evaluate("3.14159r^2", &bindings).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, 3.14159 * 4.0);
}

#[test]
fn test_normalized_text_round_trip() {
    let calculator = Calculator::default();
    let bindings = vars(&[('a', -1.5), ('b', 4.0)]);
    for formula in ["2a(b-1)", "ab^2 - a", "b/a", "(a)(b)(a)"] {
        let normalized = calculator.normalize(formula, &bindings).unwrap();
        assert_eq!(
            evaluate_expression(&normalized, calculator.options()).unwrap(),
            calculator.evaluate(formula, &bindings).unwrap(),
            "formula {:?} normalized to {:?}",
            formula,
            normalized
        );
    }
}

#[test]
fn test_propagating_options() {
    let calculator = Calculator::new(EvaluationOptions::propagating());
    let empty = VariableBindings::new();
    assert_eq!(calculator.evaluate("-1/0", &empty).unwrap(), f64::NEG_INFINITY);
    assert!(calculator.evaluate("0/0", &empty).unwrap().is_nan());
}
