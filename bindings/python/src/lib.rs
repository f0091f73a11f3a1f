//! Python bindings for Voxcalc
//!
//! Thin wrapper around `voxcalc-core` — ZERO logic here.
//! All behavior comes from the canonical Rust implementation.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use voxcalc_core::{Calculator, Config};

fn to_py_err(e: voxcalc_core::Error) -> PyErr {
    PyValueError::new_err(format!("{}: {}", e.kind(), e))
}

/// Normalize a spoken arithmetic phrase into a canonical expression.
///
/// Never fails: words that cannot be resolved are passed through and
/// rejected later by `evaluate`.
///
/// Args:
///     phrase: English or Hindi phrase, e.g. "two plus three times four"
///
/// Returns:
///     Canonical expression, e.g. "2 + 3 * 4"
#[pyfunction]
fn normalize(phrase: &str) -> String {
    voxcalc_core::normalize(phrase)
}

/// Evaluate a canonical expression.
///
/// Args:
///     expression: Canonical expression, e.g. "2 + 3 * 4"
///
/// Returns:
///     The numeric value as a float
///
/// Raises:
///     ValueError: "<Kind>: <message>", e.g. "SyntaxError: ..."
#[pyfunction]
#[pyo3(signature = (expression, allow_infinity = false))]
fn evaluate(expression: &str, allow_infinity: bool) -> PyResult<f64> {
    Calculator::new(Config::default().with_overrides(None, allow_infinity))
        .evaluate(expression)
        .map_err(to_py_err)
}

/// Run a phrase through the full pipeline.
///
/// Args:
///     phrase: English or Hindi phrase
///     significant_digits: Digits in the display string (default 10)
///     allow_infinity: Display Infinity instead of raising
///
/// Returns:
///     JSON string: {"phrase": ..., "expression": ..., "value": ..., "result": ...}
///
/// Raises:
///     ValueError: "<Kind>: <message>", e.g. "DomainError: ..."
#[pyfunction]
#[pyo3(signature = (phrase, significant_digits = None, allow_infinity = false))]
fn calculate(
    phrase: &str,
    significant_digits: Option<usize>,
    allow_infinity: bool,
) -> PyResult<String> {
    let config = Config::default().with_overrides(significant_digits, allow_infinity);
    let calculation = Calculator::new(config)
        .calculate(phrase)
        .map_err(to_py_err)?;
    Ok(calculation.to_json().to_string())
}

/// Voxcalc Python module
#[pymodule]
fn voxcalc(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate, m)?)?;
    m.add_function(wrap_pyfunction!(calculate, m)?)?;
    m.add("__version__", voxcalc_core::VERSION)?;
    Ok(())
}
