//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula validation, normalization or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Unbalanced or improperly ordered parentheses
    #[error("Mismatched parentheses in formula")]
    MismatchedParentheses,

    /// Character outside the supported alphabet
    #[error("Invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Two adjacent operators that are not a plain sign run
    #[error("Consecutive operators at position {position}")]
    ConsecutiveOperators { position: usize },

    /// `*`, `/` or `^` followed by another operator once parentheses are ignored
    #[error("Invalid operator sequence at position {position}")]
    InvalidOperatorSequence { position: usize },

    /// Formula ends with an operator
    #[error("Formula cannot end with an operator")]
    TrailingOperator,

    /// Operator immediately before a closing parenthesis
    #[error("Operator before closing parenthesis at position {position}")]
    DanglingOperator { position: usize },

    /// `*`, `/` or `^` with no left operand
    #[error("Operator without left operand at position {position}")]
    LeadingOperator { position: usize },

    /// Variable letter with no bound value
    #[error("Variable {name} is not defined.")]
    UndefinedVariable { name: char },

    /// Variable name that is not a single ASCII letter
    #[error("Invalid variable name '{name}'")]
    InvalidVariableName { name: String },

    /// Variable value that is not a finite number
    #[error("Invalid value '{value}' for variable {name}")]
    InvalidVariableValue { name: char, value: String },

    /// Expression did not reduce to a single number
    #[error("Malformed expression '{expression}': {reason}")]
    MalformedExpression { expression: String, reason: String },

    /// Non-finite result (division by zero, fractional power of a negative base, overflow)
    #[error("Result is not a finite number: {value}")]
    DomainError { value: f64 },

    /// Formula longer than the configured limit
    #[error("Formula is too long: {len} characters (max: {max})")]
    InputTooLarge { len: usize, max: usize },

    /// Parentheses nested deeper than the configured limit
    #[error("Formula nesting exceeds {max} levels")]
    RecursionLimitExceeded { max: usize },
}

impl FormulaError {
    pub(crate) fn malformed<E: Into<String>, R: Into<String>>(expression: E, reason: R) -> Self {
        FormulaError::MalformedExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// The discriminant of this error, without context
    pub fn kind(&self) -> FormulaErrorKind {
        match self {
            FormulaError::MismatchedParentheses => FormulaErrorKind::MismatchedParentheses,
            FormulaError::InvalidCharacter { .. } => FormulaErrorKind::InvalidCharacter,
            FormulaError::ConsecutiveOperators { .. } => FormulaErrorKind::ConsecutiveOperators,
            FormulaError::InvalidOperatorSequence { .. } => {
                FormulaErrorKind::InvalidOperatorSequence
            }
            FormulaError::TrailingOperator => FormulaErrorKind::TrailingOperator,
            FormulaError::DanglingOperator { .. } => FormulaErrorKind::DanglingOperator,
            FormulaError::LeadingOperator { .. } => FormulaErrorKind::LeadingOperator,
            FormulaError::UndefinedVariable { .. } => FormulaErrorKind::UndefinedVariable,
            FormulaError::InvalidVariableName { .. } => FormulaErrorKind::InvalidVariableName,
            FormulaError::InvalidVariableValue { .. } => FormulaErrorKind::InvalidVariableValue,
            FormulaError::MalformedExpression { .. } => FormulaErrorKind::MalformedExpression,
            FormulaError::DomainError { .. } => FormulaErrorKind::DomainError,
            FormulaError::InputTooLarge { .. } => FormulaErrorKind::InputTooLarge,
            FormulaError::RecursionLimitExceeded { .. } => FormulaErrorKind::RecursionLimitExceeded,
        }
    }

    /// Whether the error was raised by the validator, before any evaluation
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self.kind(),
            FormulaErrorKind::MismatchedParentheses
                | FormulaErrorKind::InvalidCharacter
                | FormulaErrorKind::ConsecutiveOperators
                | FormulaErrorKind::InvalidOperatorSequence
                | FormulaErrorKind::TrailingOperator
                | FormulaErrorKind::DanglingOperator
                | FormulaErrorKind::LeadingOperator
        )
    }
}

/// Fieldless classification of [`FormulaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaErrorKind {
    MismatchedParentheses,
    InvalidCharacter,
    ConsecutiveOperators,
    InvalidOperatorSequence,
    TrailingOperator,
    DanglingOperator,
    LeadingOperator,
    UndefinedVariable,
    InvalidVariableName,
    InvalidVariableValue,
    MalformedExpression,
    DomainError,
    InputTooLarge,
    RecursionLimitExceeded,
}

impl FormulaErrorKind {
    /// Stable identifier, suitable for lookup tables in a presentation layer
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaErrorKind::MismatchedParentheses => "MismatchedParentheses",
            FormulaErrorKind::InvalidCharacter => "InvalidCharacter",
            FormulaErrorKind::ConsecutiveOperators => "ConsecutiveOperators",
            FormulaErrorKind::InvalidOperatorSequence => "InvalidOperatorSequence",
            FormulaErrorKind::TrailingOperator => "TrailingOperator",
            FormulaErrorKind::DanglingOperator => "DanglingOperator",
            FormulaErrorKind::LeadingOperator => "LeadingOperator",
            FormulaErrorKind::UndefinedVariable => "UndefinedVariable",
            FormulaErrorKind::InvalidVariableName => "InvalidVariableName",
            FormulaErrorKind::InvalidVariableValue => "InvalidVariableValue",
            FormulaErrorKind::MalformedExpression => "MalformedExpression",
            FormulaErrorKind::DomainError => "DomainError",
            FormulaErrorKind::InputTooLarge => "InputTooLarge",
            FormulaErrorKind::RecursionLimitExceeded => "RecursionLimitExceeded",
        }
    }
}

impl std::fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
