//! Variable detection and bindings

use crate::error::{FormulaError, FormulaResult};

/// Distinct variable letters of a formula, in order of first occurrence
///
/// Every ASCII letter is its own variable, so `"ab + a"` yields `['a', 'b']`.
pub fn detect_variables(formula: &str) -> Vec<char> {
    let mut names = Vec::new();
    for c in formula.chars().filter(char::is_ascii_alphabetic) {
        if !names.contains(&c) {
            names.push(c);
        }
    }
    names
}

/// Values bound to single-letter variables
///
/// Names are ASCII letters and case-sensitive; values are always finite.
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBindings {
    entries: Vec<(char, f64)>,
}

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build bindings from `(name, value)` pairs
    pub fn from_values<I>(values: I) -> FormulaResult<Self>
    where
        I: IntoIterator<Item = (char, f64)>,
    {
        let mut bindings = Self::new();
        for (name, value) in values {
            bindings.insert(name, value)?;
        }
        Ok(bindings)
    }

    /// Bindings for exactly the variables of `formula`
    ///
    /// Values already present in `previous` are kept; newly detected
    /// variables start at `0`. Variables no longer in the formula are
    /// dropped.
    pub fn synchronize(formula: &str, previous: &VariableBindings) -> Self {
        let entries = detect_variables(formula)
            .into_iter()
            .map(|name| (name, previous.get(name).unwrap_or(0.0)))
            .collect();
        Self { entries }
    }

    /// Bind `name` to `value`, returning the previous value
    pub fn insert(&mut self, name: char, value: f64) -> FormulaResult<Option<f64>> {
        if !name.is_ascii_alphabetic() {
            return Err(FormulaError::InvalidVariableName {
                name: name.to_string(),
            });
        }
        if !value.is_finite() {
            return Err(FormulaError::InvalidVariableValue {
                name,
                value: value.to_string(),
            });
        }

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => Ok(Some(std::mem::replace(&mut entry.1, value))),
            None => {
                self.entries.push((name, value));
                Ok(None)
            }
        }
    }

    /// Bind `name` to a value given as text, e.g. from an input field
    pub fn insert_text(&mut self, name: char, text: &str) -> FormulaResult<Option<f64>> {
        let value = parse_value(name, text)?;
        self.insert(name, value)
    }

    /// Bind a variable whose name is given as text; the name must be one letter
    pub fn insert_named(&mut self, name: &str, text: &str) -> FormulaResult<Option<f64>> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.insert_text(c, text),
            _ => Err(FormulaError::InvalidVariableName {
                name: name.to_string(),
            }),
        }
    }

    pub fn get(&self, name: char) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, value)| value)
    }

    pub fn remove(&mut self, name: char) -> Option<f64> {
        let index = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: char) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.entries.iter().copied()
    }
}

fn parse_value(name: char, text: &str) -> FormulaResult<f64> {
    let invalid = || FormulaError::InvalidVariableValue {
        name,
        value: text.to_string(),
    };

    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}
