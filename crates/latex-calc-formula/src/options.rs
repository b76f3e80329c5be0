//! Evaluation options

/// Default maximum formula length, in characters after whitespace is stripped
pub const DEFAULT_MAX_FORMULA_LEN: usize = 4096;

/// Default maximum nesting of parentheses and unary signs
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum depth of the parsed expression tree
pub const DEFAULT_MAX_TREE_DEPTH: usize = 4096;

/// What to do when a result is NaN or infinite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NonFinitePolicy {
    /// Fail with [`FormulaError::DomainError`](crate::FormulaError::DomainError)
    #[default]
    Reject,
    /// Return the IEEE 754 value (NaN, +inf, -inf) as the result
    Propagate,
}

/// Options for formula evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaluationOptions {
    /// Maximum formula length (after stripping whitespace)
    pub max_formula_len: usize,
    /// Maximum nesting depth of parentheses and signs
    pub max_depth: usize,
    /// Maximum depth of the expression tree, which bounds evaluation recursion
    pub max_tree_depth: usize,
    /// Handling of NaN and infinite results
    pub non_finite: NonFinitePolicy,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            max_formula_len: DEFAULT_MAX_FORMULA_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            non_finite: NonFinitePolicy::Reject,
        }
    }
}

impl EvaluationOptions {
    /// Options that return NaN and infinities instead of failing
    pub fn propagating() -> Self {
        Self {
            non_finite: NonFinitePolicy::Propagate,
            ..Default::default()
        }
    }
}
