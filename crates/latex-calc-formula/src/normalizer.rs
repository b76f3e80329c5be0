//! Formula normalization
//!
//! Rewrites a validated formula into plain numeric expression text:
//! explicit multiplication, substituted variable values, collapsed signs.

use lazy_regex::{regex, regex_replace_all};

use crate::error::{FormulaError, FormulaResult};
use crate::variables::VariableBindings;

pub fn strip_whitespace(formula: &str) -> String {
    formula.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Normalize a formula against a set of variable bindings
///
/// # Example
/// ```rust
/// use latex_calc_formula::{normalize, VariableBindings};
///
/// let bindings = VariableBindings::from_values([('a', 3.0), ('b', 2.0)]).unwrap();
/// assert_eq!(normalize("2ab - -1", &bindings).unwrap(), "2*3*2+1");
/// ```
pub fn normalize(formula: &str, bindings: &VariableBindings) -> FormulaResult<String> {
    let explicit = insert_implicit_multiplication(&strip_whitespace(formula));
    let substituted = substitute_variables(&explicit, bindings)?;
    let collapsed = collapse_signs(&substituted);
    Ok(simplify_double_negation(&collapsed))
}

/// Insert `*` wherever juxtaposition means multiplication
///
/// `2a`, `a2`, `ab`, `2(`, `a(`, `)2`, `)a` and `)(` all gain an explicit
/// operator. Each letter is a separate factor: `abc` becomes `a*b*c`.
pub fn insert_implicit_multiplication(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len() * 2);
    let mut previous: Option<char> = None;

    for c in formula.chars() {
        if let Some(p) = previous {
            if implies_multiplication(p, c) {
                out.push('*');
            }
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

fn implies_multiplication(previous: char, next: char) -> bool {
    let operand_end = previous.is_ascii_alphanumeric() || previous == ')';
    let operand_start = next.is_ascii_alphabetic() || next == '(';

    match (previous, next) {
        (')', n) if n.is_ascii_digit() => true,
        (p, n) if p.is_ascii_alphabetic() && n.is_ascii_digit() => true,
        _ => operand_end && operand_start,
    }
}

/// Replace each variable letter by its bound value
///
/// Negative values are parenthesized so that `c-a^2` with `a = -3` keeps
/// its meaning.
fn substitute_variables(formula: &str, bindings: &VariableBindings) -> FormulaResult<String> {
    let chars: Vec<char> = formula.chars().collect();
    let mut out = String::with_capacity(formula.len() * 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphabetic() {
            out.push(c);
            continue;
        }

        let value = bindings
            .get(c)
            .ok_or(FormulaError::UndefinedVariable { name: c })?;

        let touches_decimal_point =
            (i > 0 && chars[i - 1] == '.') || chars.get(i + 1) == Some(&'.');
        if touches_decimal_point {
            return Err(FormulaError::malformed(
                formula,
                format!("variable {} adjacent to a decimal point", c),
            ));
        }

        out.push_str(&format_value(value));
    }

    Ok(out)
}

/// Decimal text of a bound value, never in exponent notation
pub(crate) fn format_value(value: f64) -> String {
    if value.is_sign_negative() {
        format!("({})", value)
    } else {
        value.to_string()
    }
}

/// Collapse runs of `+`/`-` into a single sign
///
/// `++` and `--` become `+`, `+-` and `-+` become `-`.
pub fn collapse_signs(text: &str) -> String {
    regex_replace_all!(r"[+-]{2,}", text, |run: &str| {
        if run.chars().filter(|&c| c == '-').count() % 2 == 0 {
            "+"
        } else {
            "-"
        }
    })
    .into_owned()
}

/// Rewrite `(-(-X))` to `X` for a numeric literal `X`, until none remain
pub fn simplify_double_negation(text: &str) -> String {
    let pattern = regex!(r"\(-\(-(\d+(?:\.\d+)?)\)\)");
    let mut current = text.to_string();
    while pattern.is_match(&current) {
        current = pattern.replace_all(&current, "$1").into_owned();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bindings(values: &[(char, f64)]) -> VariableBindings {
        VariableBindings::from_values(values.iter().copied()).unwrap()
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(insert_implicit_multiplication("2a"), "2*a");
        assert_eq!(insert_implicit_multiplication("a2"), "a*2");
        assert_eq!(insert_implicit_multiplication("abc"), "a*b*c");
        assert_eq!(insert_implicit_multiplication("2(a+1)"), "2*(a+1)");
        assert_eq!(insert_implicit_multiplication("x(y)"), "x*(y)");
        assert_eq!(insert_implicit_multiplication("(a)b"), "(a)*b");
        assert_eq!(insert_implicit_multiplication("(a)3"), "(a)*3");
        assert_eq!(insert_implicit_multiplication("(a)(b)"), "(a)*(b)");
        assert_eq!(insert_implicit_multiplication("12.5+3"), "12.5+3");
        assert_eq!(insert_implicit_multiplication("2.5x^2y"), "2.5*x^2*y");
    }

    #[test]
    fn test_substitution() {
        let vars = bindings(&[('a', 3.0), ('b', 0.5)]);
        assert_eq!(normalize("2a + b", &vars).unwrap(), "2*3+0.5");
        assert_eq!(normalize("ab", &vars).unwrap(), "3*0.5");
    }

    #[test]
    fn test_negative_values_are_parenthesized() {
        let vars = bindings(&[('a', -3.0), ('c', 1.0)]);
        assert_eq!(normalize("c-a^2", &vars).unwrap(), "1-(-3)^2");
        assert_eq!(normalize("(-a)", &vars).unwrap(), "3");
    }

    #[test]
    fn test_undefined_variable() {
        let vars = bindings(&[('a', 1.0)]);
        assert_eq!(
            normalize("a + B", &vars),
            Err(FormulaError::UndefinedVariable { name: 'B' })
        );
    }

    #[test]
    fn test_variable_next_to_decimal_point() {
        let vars = bindings(&[('a', 1.0)]);
        assert!(matches!(
            normalize("a.5", &vars),
            Err(FormulaError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_collapse_signs() {
        assert_eq!(collapse_signs("5--3"), "5+3");
        assert_eq!(collapse_signs("5++3"), "5+3");
        assert_eq!(collapse_signs("5+-3"), "5-3");
        assert_eq!(collapse_signs("5-+3"), "5-3");
        assert_eq!(collapse_signs("5---3"), "5-3");
        assert_eq!(collapse_signs("-+-+1"), "+1");
        assert_eq!(collapse_signs("1-2"), "1-2");
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(simplify_double_negation("(-(-4))"), "4");
        assert_eq!(simplify_double_negation("2*(-(-1.5))"), "2*1.5");
        assert_eq!(simplify_double_negation("(-(-(-(-7))))"), "7");
        assert_eq!(simplify_double_negation("(-(-2+3))"), "(-(-2+3))");
    }

    #[test]
    fn test_whitespace_stripped() {
        let vars = bindings(&[('x', 2.0)]);
        assert_eq!(normalize(" 3 x \t+ 1 ", &vars).unwrap(), "3*2+1");
    }
}
