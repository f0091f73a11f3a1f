//! JavaScript/TypeScript bindings for Voxcalc
//!
//! Thin wrapper around `voxcalc-core` compiled to WebAssembly.
//! ZERO logic here — all behavior from the canonical Rust implementation.

use wasm_bindgen::prelude::*;

use voxcalc_core::{Calculator, Config};

fn to_js_err(e: voxcalc_core::Error) -> JsError {
    JsError::new(&format!("{}: {}", e.kind(), e))
}

/// Normalize a spoken arithmetic phrase into a canonical expression.
///
/// @param phrase - English or Hindi phrase, e.g. "two plus three times four"
/// @returns Canonical expression, e.g. "2 + 3 * 4"
#[wasm_bindgen]
pub fn normalize(phrase: &str) -> String {
    voxcalc_core::normalize(phrase)
}

/// Evaluate a canonical expression.
///
/// @param expression - Canonical expression, e.g. "2 + 3 * 4"
/// @returns The numeric value
/// @throws Error "<Kind>: <message>" for any calculation failure
#[wasm_bindgen]
pub fn evaluate(expression: &str) -> Result<f64, JsError> {
    voxcalc_core::evaluate(expression).map_err(to_js_err)
}

/// Run a phrase through the full pipeline.
///
/// @param phrase - English or Hindi phrase
/// @returns JSON string: { phrase, expression, value, result }
/// @throws Error "<Kind>: <message>" for any calculation failure
#[wasm_bindgen]
pub fn calculate(phrase: &str) -> Result<String, JsError> {
    calculate_with_options(phrase, None, false)
}

/// Run a phrase through the full pipeline with explicit display options.
///
/// @param phrase - English or Hindi phrase
/// @param significantDigits - Digits in the display string (default 10)
/// @param allowInfinity - Display Infinity instead of throwing
/// @returns JSON string: { phrase, expression, value, result }
#[wasm_bindgen(js_name = "calculateWithOptions")]
pub fn calculate_with_options(
    phrase: &str,
    significant_digits: Option<usize>,
    allow_infinity: bool,
) -> Result<String, JsError> {
    let config = Config::default().with_overrides(significant_digits, allow_infinity);
    let calculation = Calculator::new(config)
        .calculate(phrase)
        .map_err(to_js_err)?;
    Ok(calculation.to_json().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_normalize() {
        assert_eq!(normalize("two plus three times four"), "2 + 3 * 4");
    }

    #[wasm_bindgen_test]
    fn test_evaluate() {
        assert_eq!(evaluate("2 + 3 * 4").ok(), Some(14.0));
    }

    #[wasm_bindgen_test]
    fn test_calculate_json() {
        let json = calculate("दो जोड़ तीन").ok().expect("calculation succeeds");
        assert!(json.contains("\"result\":\"5\""), "{}", json);
    }

    #[wasm_bindgen_test]
    fn test_calculate_with_options() {
        let json = calculate_with_options("1 divided by 0", None, true)
            .ok()
            .expect("infinity is displayed");
        assert!(json.contains("\"result\":\"Infinity\""), "{}", json);
    }
}
