//! # latex-calc-markup
//!
//! Turns formula text into LaTeX-like HTML for display:
//! - `*` becomes a centered dot (`&sdot;`)
//! - `n/d` becomes a stacked fraction
//! - `^x` becomes a superscript
//!
//! Rendering works on the formula exactly as typed and never affects
//! evaluation. Input is HTML-escaped first, so the output is safe to inject
//! as markup.
//!
//! ```rust
//! use latex_calc_markup::render_markup;
//!
//! assert_eq!(render_markup("a*b^2"), "a &sdot; b<sup>2</sup>");
//! ```

use lazy_regex::regex_replace_all;

const MULTIPLICATION_DOT: &str = " &sdot; ";

/// Render a formula as display markup
pub fn render_markup(formula: &str) -> String {
    let escaped = escape_html(formula);
    let dotted = escaped.replace('*', MULTIPLICATION_DOT);

    // Parenthesized groups or terms with an optional exponent
    let with_fractions = regex_replace_all!(
        r"(\([^()]*\)|[a-zA-Z0-9]+(?:\^[a-zA-Z0-9]+)?)\s*/\s*(\([^()]*\)|[a-zA-Z0-9]+(?:\^[a-zA-Z0-9]+)?)",
        &dotted,
        |_, numerator: &str, denominator: &str| fraction(numerator, denominator)
    );

    // Word terms with exponents left over from the first pass
    let with_fractions = regex_replace_all!(
        r"(\w+(?:\^\w+)?)\s*/\s*(\w+(?:\^\w+)?)",
        &with_fractions,
        |_, numerator: &str, denominator: &str| fraction(numerator, denominator)
    );

    regex_replace_all!(r"\^([a-zA-Z]|\d+)", &with_fractions, |_, exponent: &str| {
        superscript(exponent)
    })
    .into_owned()
}

fn fraction(numerator: &str, denominator: &str) -> String {
    format!(
        "<span class=\"fraction\"><span class=\"numerator\">{}</span><span class=\"denominator\">{}</span></span>",
        numerator, denominator
    )
}

fn superscript(exponent: &str) -> String {
    format!("<sup>{}</sup>", exponent)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
