//! # latex-calc-formula
//!
//! Formula validator, normalizer and evaluator for latex-calc.
//!
//! This crate provides:
//! - Formula validation (structural checks on raw text)
//! - Normalization (implicit multiplication, variable substitution, sign collapsing)
//! - Expression parsing (text → tree) and evaluation (tree → `f64`)
//! - Variable detection and bindings
//!
//! ## Example
//!
//! ```rust
//! use latex_calc_formula::{detect_variables, evaluate, VariableBindings};
//!
//! let formula = "2a + b^2";
//! assert_eq!(detect_variables(formula), vec!['a', 'b']);
//!
//! let mut bindings = VariableBindings::new();
//! bindings.insert_text('a', "1.5").unwrap();
//! bindings.insert('b', 3.0).unwrap();
//! assert_eq!(evaluate(formula, &bindings).unwrap(), 12.0);
//! ```

pub mod ast;
pub mod calculator;
pub mod error;
pub mod evaluator;
pub mod normalizer;
pub mod options;
pub mod parser;
pub mod validator;
pub mod variables;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use calculator::{evaluate, Calculator};
pub use error::{FormulaError, FormulaErrorKind, FormulaResult};
pub use evaluator::{evaluate_expression, evaluate_tree};
pub use normalizer::normalize;
pub use options::{EvaluationOptions, NonFinitePolicy};
pub use parser::parse_expression;
pub use validator::validate;
pub use variables::{detect_variables, VariableBindings};
