//! Voxcalc Core - natural-language arithmetic for English and Hindi
//!
//! This crate holds every piece of calculator semantics.
//! The CLI and the language bindings (Python, JavaScript) only wrap it.
//!
//! # Architecture
//!
//! ```text
//! Phrase → Normalizer → Canonical Expression → Evaluator → Value → Display String
//!              ↑                                  ↓
//!           Lexicon                     Factorial expansion + Parser (closed grammar)
//! ```
//!
//! # Guarantees
//!
//! - **Total normalization**: `normalize` never fails
//! - **Closed grammar**: only numbers, `+ - * / % **`, parentheses and an
//!   allow-list of math functions are ever evaluated
//! - **Classified errors**: every failure carries an [`ErrorKind`]
//! - **Stateless**: no shared mutable state, calls may run concurrently

pub mod builtins;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod lexicon;
pub mod normalizer;
pub mod parser;
pub mod speech;

pub use config::{Config, NonFinitePolicy};
pub use error::{Error, ErrorKind, Result};
pub use evaluator::Evaluator;
pub use history::{CalculationRecord, History};
pub use normalizer::normalize;

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of running a phrase through the full pipeline
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Calculation {
    /// Phrase as given
    pub phrase: String,
    /// Canonical expression produced by the normalizer
    pub expression: String,
    pub value: f64,
    /// Display string, bounded significant digits
    pub result: String,
}

impl Calculation {
    /// JSON object with the calculation fields; non-finite values become `null`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "phrase": self.phrase,
            "expression": self.expression,
            "value": self.value,
            "result": self.result,
        })
    }
}

/// Normalizer + evaluator under one configuration
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    evaluator: Evaluator,
}

impl Calculator {
    pub fn new(config: Config) -> Self {
        Calculator {
            evaluator: Evaluator::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        self.evaluator.config()
    }

    pub fn normalize(&self, phrase: &str) -> String {
        normalizer::normalize(phrase)
    }

    /// Evaluate an already canonical expression
    pub fn evaluate(&self, expression: &str) -> Result<f64> {
        self.evaluator.evaluate(expression)
    }

    /// Evaluate an already canonical expression and format the value
    pub fn evaluate_display(&self, expression: &str) -> Result<(f64, String)> {
        self.evaluator.evaluate_display(expression)
    }

    /// Normalize, evaluate and format a phrase
    pub fn calculate(&self, phrase: &str) -> Result<Calculation> {
        let expression = self.normalize(phrase);
        tracing::debug!(phrase, expression = %expression, "normalized");

        let (value, result) = self.evaluate_display(&expression)?;
        Ok(Calculation {
            phrase: phrase.to_string(),
            expression,
            value,
            result,
        })
    }
}

/// Evaluate a canonical expression with the default configuration
pub fn evaluate(expression: &str) -> Result<f64> {
    evaluator::evaluate(expression)
}

/// Run a phrase through the full pipeline with the default configuration
pub fn calculate(phrase: &str) -> Result<Calculation> {
    Calculator::default().calculate(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(phrase: &str) -> String {
        calculate(phrase).unwrap().result
    }

    // ── Pipeline properties ────────────────────────────

    #[test]
    fn test_number_words_map_to_digits() {
        assert!(normalize("twelve").contains("12"));
        assert!(normalize("बारह").contains("12"));
    }

    #[test]
    fn test_negative_phrase_evaluates() {
        let expression = normalize("negative five plus three");
        assert_eq!(evaluate(&expression).unwrap(), -2.0);
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(result("two plus three times four"), "14");
    }

    #[test]
    fn test_sine_of_degrees() {
        let calculation = calculate("sine of 30 degrees").unwrap();
        assert_eq!(calculation.expression, "(Math.sin(0.5235987755982988))");
        assert_eq!(calculation.result, "0.5");
    }

    #[test]
    fn test_factorial() {
        assert_eq!(result("5 factorial"), "120");
        assert_eq!(result("five factorial"), "120");
        assert_eq!(result("factorial of five"), "120");
        assert_eq!(calculate("negative one factorial").unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(calculate("171 factorial").unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_empty_phrase() {
        assert_eq!(calculate("").unwrap_err(), Error::EmptyExpression);
        assert_eq!(calculate("   ").unwrap_err(), Error::EmptyExpression);
        assert_eq!(calculate("please calculate").unwrap_err(), Error::EmptyExpression);
    }

    #[test]
    fn test_division_by_zero_rejected_by_default() {
        let err = calculate("1 divided by 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResult);
    }

    #[test]
    fn test_division_by_zero_displayed_when_allowed() {
        let calculator = Calculator::new(Config {
            non_finite: NonFinitePolicy::Display,
            ..Config::default()
        });
        assert_eq!(calculator.calculate("1 divided by 0").unwrap().result, "Infinity");
    }

    #[test]
    fn test_normalize_idempotent_on_canonical_output() {
        for phrase in ["two plus three", "sine of 30 degrees", "five factorial", "दो जोड़ तीन"] {
            let once = normalize(phrase);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_hindi_and_english_agree() {
        let hindi = calculate("दो जोड़ तीन").unwrap();
        let english = calculate("two plus three").unwrap();
        assert_eq!(hindi.result, "5");
        assert_eq!(hindi.value, english.value);
        assert_eq!(hindi.result, english.result);
    }

    // ── Broader phrasing ───────────────────────────────

    #[test]
    fn test_compound_and_magnitude_phrases() {
        assert_eq!(result("twenty five plus seventy five"), "100");
        assert_eq!(result("two thousand five hundred divided by five"), "500");
        assert_eq!(result("दो लाख गुणा दो"), "400000");
    }

    #[test]
    fn test_function_phrases() {
        assert_eq!(result("square root of sixteen"), "4");
        assert_eq!(result("five squared"), "25");
        assert_eq!(result("two to the power of ten"), "1024");
        assert_eq!(result("cube root of twenty seven"), "3");
        assert_eq!(result("log of e"), "1");
        assert_eq!(result("ten mod three"), "1");
        assert_eq!(result("max of three and nine"), "9");
        assert_eq!(result("absolute value of minus four"), "4");
        assert_eq!(result("round 2.5"), "3");
        assert_eq!(result("two pi"), "6.283185307");
    }

    #[test]
    fn test_trig_phrases() {
        assert_eq!(result("cos 60"), "0.5");
        assert_eq!(result("tan of 45 degrees"), "1");
        assert_eq!(result("two times sin 30"), "1");
        assert_eq!(result("arc sine of 0.5"), "30");
        assert_eq!(result("sin(30)"), "0.5");
        assert_eq!(result("sin(30)"), result("sin 30"));
    }

    #[test]
    fn test_unresolved_words_are_syntax_errors() {
        let err = calculate("banana plus two").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_custom_significant_digits() {
        let calculator = Calculator::new(Config {
            significant_digits: 3,
            ..Config::default()
        });
        assert_eq!(calculator.calculate("pi").unwrap().result, "3.14");
    }

    #[test]
    fn test_calculation_json() {
        let json = calculate("two plus two").unwrap().to_json();
        assert_eq!(json["phrase"], "two plus two");
        assert_eq!(json["expression"], "2 + 2");
        assert_eq!(json["value"], 4.0);
        assert_eq!(json["result"], "4");
    }

    #[test]
    fn test_determinism_100_iterations() {
        let input = "what is twenty five squared plus sine of 30 degrees";
        let first = calculate(input).unwrap();
        for i in 0..100 {
            let result = calculate(input).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
