//! WebAssembly bindings for latex-calc
//!
//! This module provides wasm-bindgen-based WebAssembly bindings for the latex-calc formula
//! engine, allowing a browser form to detect variables, evaluate formulas and render markup.

use std::collections::BTreeMap;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use latex_calc_formula::{Calculator, EvaluationOptions, FormulaError, VariableBindings};

// =============================================================================
// Error Conversion
// =============================================================================

/// A JS `Error` named `FormulaError` with a `kind` property
fn formula_error_to_js(e: FormulaError) -> JsValue {
    let error = js_sys::Error::new(&e.to_string());
    error.set_name("FormulaError");
    js_sys::Reflect::set(&error, &"kind".into(), &e.kind().as_str().into()).ok();
    error.into()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsError::new(&e.to_string()).into()
}

// =============================================================================
// Variable bindings from JavaScript objects
// =============================================================================

/// Values typed into a form arrive as strings, values set from code as numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum BindingValue {
    Number(f64),
    Text(String),
}

impl BindingValue {
    fn into_text(self) -> String {
        match self {
            BindingValue::Number(n) => n.to_string(),
            BindingValue::Text(s) => s,
        }
    }
}

fn js_to_raw_bindings(value: JsValue) -> Result<BTreeMap<String, BindingValue>, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(BTreeMap::new());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| to_js_error(format!("Bindings must map names to numbers or strings: {}", e)))
}

fn js_to_bindings(value: JsValue) -> Result<VariableBindings, JsValue> {
    let mut bindings = VariableBindings::new();
    for (name, value) in js_to_raw_bindings(value)? {
        bindings
            .insert_named(&name, &value.into_text())
            .map_err(formula_error_to_js)?;
    }
    Ok(bindings)
}

// =============================================================================
// Free functions
// =============================================================================

/// Evaluate a formula with default options
#[wasm_bindgen]
pub fn evaluate(formula: &str, bindings: JsValue) -> Result<f64, JsValue> {
    FormulaCalculator::default().evaluate(formula, bindings)
}

/// Normalized numeric expression text of a formula
#[wasm_bindgen]
pub fn normalize(formula: &str, bindings: JsValue) -> Result<String, JsValue> {
    FormulaCalculator::default().normalize(formula, bindings)
}

/// Distinct variable letters in order of first occurrence
#[wasm_bindgen(js_name = detectVariables)]
pub fn detect_variables(formula: &str) -> Vec<String> {
    latex_calc_formula::detect_variables(formula)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Form values for exactly the variables of `formula`
///
/// Keeps whatever text was entered for variables still present and fills
/// new or emptied ones with `"0"`.
#[wasm_bindgen(js_name = synchronizeVariables)]
pub fn synchronize_variables(formula: &str, previous: JsValue) -> Result<JsValue, JsValue> {
    let mut previous = js_to_raw_bindings(previous)?;
    let values = js_sys::Object::new();

    for name in latex_calc_formula::detect_variables(formula) {
        let key = name.to_string();
        let text = previous
            .remove(&key)
            .map(BindingValue::into_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "0".to_string());
        js_sys::Reflect::set(&values, &key.into(), &text.into())?;
    }

    Ok(values.into())
}

/// LaTeX-like HTML markup for display
#[wasm_bindgen(js_name = renderMarkup)]
pub fn render_markup(formula: &str) -> String {
    latex_calc_markup::render_markup(formula)
}

// =============================================================================
// FormulaCalculator - JavaScript wrapper with options
// =============================================================================

/// Formula calculator with fixed evaluation options.
#[wasm_bindgen]
#[derive(Default)]
pub struct FormulaCalculator {
    inner: Calculator,
}

#[wasm_bindgen]
impl FormulaCalculator {
    /// `options` may be undefined or
    /// `{ max_formula_len, max_depth, max_tree_depth, non_finite }`
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<FormulaCalculator, JsValue> {
        let options: EvaluationOptions = if options.is_null() || options.is_undefined() {
            EvaluationOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };
        Ok(Self {
            inner: Calculator::new(options),
        })
    }

    pub fn evaluate(&self, formula: &str, bindings: JsValue) -> Result<f64, JsValue> {
        let bindings = js_to_bindings(bindings)?;
        self.inner
            .evaluate(formula, &bindings)
            .map_err(formula_error_to_js)
    }

    pub fn normalize(&self, formula: &str, bindings: JsValue) -> Result<String, JsValue> {
        let bindings = js_to_bindings(bindings)?;
        self.inner
            .normalize(formula, &bindings)
            .map_err(formula_error_to_js)
    }

    #[wasm_bindgen(getter, js_name = maxDepth)]
    pub fn max_depth(&self) -> usize {
        self.inner.options().max_depth
    }

    #[wasm_bindgen(getter, js_name = maxFormulaLength)]
    pub fn max_formula_len(&self) -> usize {
        self.inner.options().max_formula_len
    }
}

#[wasm_bindgen(start)]
pub fn init() {}
