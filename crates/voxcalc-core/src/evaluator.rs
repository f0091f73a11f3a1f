//! Expression evaluator — canonical expression string → numeric value
//!
//! # Pipeline
//!
//! 1. Expand `<digits>!` into the decimal value of the factorial
//! 2. Strip `=` artifacts left by "equals" and trim
//! 3. Reject an empty expression
//! 4. Parse under the closed grammar and evaluate in IEEE-754 doubles
//! 5. Reject NaN (and ±Infinity unless the policy displays it)
//! 6. Format to a bounded number of significant digits
//!
//! The evaluator is pure apart from `Math.random`: no I/O, no shared state.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use crate::config::{Config, NonFinitePolicy};
use crate::parser::ast::{BinaryOp, Expr, UnaryOp};
use crate::{Error, Result};

/// Largest operand whose factorial is finite in f64
pub const MAX_FACTORIAL: u64 = 170;

static FACTORIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?)(\d+(?:\.\d+)?)\s*!").expect("factorial pattern is valid"));

// ── Evaluator ─────────────────────────────────────────────

/// Evaluates canonical expressions under a [`Config`]
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: Config,
}

impl Evaluator {
    pub fn new(config: Config) -> Self {
        Evaluator { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate a canonical expression to a validated number
    ///
    /// # Errors
    /// `Domain`/`Overflow` from factorial expansion, `EmptyExpression`,
    /// `Syntax` for input outside the grammar, `InvalidResult` for NaN and
    /// (under the default policy) infinite values.
    pub fn evaluate(&self, expression: &str) -> Result<f64> {
        #[cfg(not(target_arch = "wasm32"))]
        let started = Instant::now();

        let expanded = expand_factorials(expression)?;
        let stripped = strip_equals(&expanded);
        if stripped.is_empty() {
            return Err(Error::EmptyExpression);
        }

        let ast = crate::parser::parse(&stripped)?;
        tracing::debug!(expression = %stripped, ast = %ast, "parsed expression");

        let value = eval(&ast);
        self.validate(value)?;

        #[cfg(not(target_arch = "wasm32"))]
        tracing::trace!(elapsed_us = started.elapsed().as_micros() as u64, value, "evaluated");

        Ok(value)
    }

    /// Evaluate and format for display
    pub fn evaluate_display(&self, expression: &str) -> Result<(f64, String)> {
        let value = self.evaluate(expression)?;
        Ok((value, self.format(value)))
    }

    /// Display string for an already validated value
    pub fn format(&self, value: f64) -> String {
        format_number(value, self.config.digits())
    }

    fn validate(&self, value: f64) -> Result<()> {
        if value.is_nan() {
            return Err(Error::InvalidResult(
                "the calculation has no numeric result (NaN)".into(),
            ));
        }
        if value.is_infinite() && self.config.non_finite == NonFinitePolicy::Reject {
            return Err(Error::InvalidResult(format!(
                "the result is not finite ({})",
                if value > 0.0 { "Infinity" } else { "-Infinity" }
            )));
        }
        Ok(())
    }
}

/// Evaluate with the default configuration
pub fn evaluate(expression: &str) -> Result<f64> {
    Evaluator::default().evaluate(expression)
}

// ── Factorial pre-expansion ───────────────────────────────

/// Replace every `<digits>!` with the decimal value of its factorial
///
/// A `-` directly before the digits counts as a sign only when it is not
/// preceded by an operand; `5 -3!` subtracts `3!`.
///
/// # Errors
/// `Domain` for negative or fractional operands, `Overflow` above 170.
pub fn expand_factorials(expression: &str) -> Result<String> {
    let mut out = String::with_capacity(expression.len());
    let mut last = 0;

    for caps in FACTORIAL.captures_iter(expression) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        out.push_str(&expression[last..whole.start]);
        last = whole.end;

        let signed = !caps[1].is_empty() && !follows_operand(&expression[..whole.start]);
        if !caps[1].is_empty() && !signed {
            out.push('-');
        }
        out.push_str(&factorial_text(&caps, signed)?);
    }

    out.push_str(&expression[last..]);
    Ok(out)
}

fn factorial_text(caps: &Captures, negative: bool) -> Result<String> {
    let operand = &caps[2];
    if negative {
        return Err(Error::Domain(format!(
            "factorial of a negative number (-{}) is undefined",
            operand
        )));
    }
    let n: u64 = operand.parse().map_err(|_| {
        if operand.contains('.') {
            Error::Domain(format!(
                "factorial is only defined for whole numbers, got {}",
                operand
            ))
        } else {
            Error::Overflow(format!(
                "factorial of {} exceeds the largest representable value ({}!)",
                operand, MAX_FACTORIAL
            ))
        }
    })?;
    if n > MAX_FACTORIAL {
        return Err(Error::Overflow(format!(
            "factorial of {} exceeds the largest representable value ({}!)",
            n, MAX_FACTORIAL
        )));
    }
    Ok(format!("{}", factorial(n)))
}

/// Iterative factorial in f64, exact up to 22! and finite up to 170!
pub fn factorial(n: u64) -> f64 {
    (2..=n).fold(1.0, |acc, k| acc * k as f64)
}

fn follows_operand(prefix: &str) -> bool {
    match prefix.trim_end().chars().last() {
        Some(c) => c.is_ascii_alphanumeric() || c == ')' || c == '.',
        None => false,
    }
}

fn strip_equals(expression: &str) -> String {
    expression.replace('=', "").trim().to_string()
}

// ── AST evaluation ────────────────────────────────────────

fn eval(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Constant(c) => c.value,
        Expr::Unary { op, operand } => {
            let value = eval(operand);
            match op {
                UnaryOp::Neg => -value,
                UnaryOp::Plus => value,
            }
        }
        Expr::Binary { op, left, right } => {
            let l = eval(left);
            let r = eval(right);
            match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => l / r,
                BinaryOp::Rem => l % r,
                BinaryOp::Pow => l.powf(r),
            }
        }
        Expr::Call { function, args } => {
            let values: Vec<f64> = args.iter().map(eval).collect();
            (function.apply)(&values)
        }
    }
}

// ── Display formatting ────────────────────────────────────

/// Format to `digits` significant digits and trim trailing fractional zeros
///
/// Fixed notation for decimal exponents in `[-6, digits)`, exponential
/// (`1.5e+21`) otherwise. `-0` prints as `0`.
pub fn format_number(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }

    let digits = digits.max(1);
    // Rounded scientific form gives the post-rounding exponent
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (scientific.clone(), 0),
    };

    if exponent < -6 || exponent >= digits as i32 {
        let mantissa = trim_fraction(&mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{}", mantissa, sign, exponent.abs());
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    let fixed = format!("{:.*}", decimals, value);
    let trimmed = trim_fraction(&fixed);
    if trimmed == "-0" {
        "0".into()
    } else {
        trimmed
    }
}

fn trim_fraction(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
