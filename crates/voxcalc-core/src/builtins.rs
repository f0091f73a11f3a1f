//! Closed allow-list of math functions and constants
//!
//! This table is the only way a name can enter an evaluated expression.
//! Both the parser (to resolve identifiers) and the normalizer (to protect
//! already-canonical `Math.*` tokens) look names up here.

use std::f64::consts;

/// Number of arguments a builtin accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Arity::Exactly(1) => write!(f, "exactly 1 argument"),
            Arity::Exactly(n) => write!(f, "exactly {} arguments", n),
            Arity::AtLeast(1) => write!(f, "at least 1 argument"),
            Arity::AtLeast(n) => write!(f, "at least {} arguments", n),
        }
    }
}

/// A callable math function
pub struct Function {
    pub name: &'static str,
    pub arity: Arity,
    pub apply: fn(&[f64]) -> f64,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A named constant
#[derive(Debug, PartialEq)]
pub struct Constant {
    pub name: &'static str,
    pub value: f64,
}

/// Prefix carried by canonical function tokens (`Math.sqrt`)
pub const NAMESPACE: &str = "Math.";

pub static FUNCTIONS: &[Function] = &[
    Function { name: "sqrt", arity: Arity::Exactly(1), apply: |a| a[0].sqrt() },
    Function { name: "sin", arity: Arity::Exactly(1), apply: |a| a[0].sin() },
    Function { name: "cos", arity: Arity::Exactly(1), apply: |a| a[0].cos() },
    Function { name: "tan", arity: Arity::Exactly(1), apply: |a| a[0].tan() },
    Function { name: "log", arity: Arity::Exactly(1), apply: |a| a[0].ln() },
    Function { name: "abs", arity: Arity::Exactly(1), apply: |a| a[0].abs() },
    Function { name: "round", arity: Arity::Exactly(1), apply: |a| round_half_up(a[0]) },
    Function { name: "floor", arity: Arity::Exactly(1), apply: |a| a[0].floor() },
    Function { name: "ceil", arity: Arity::Exactly(1), apply: |a| a[0].ceil() },
    Function { name: "random", arity: Arity::Exactly(0), apply: |_| rand::random::<f64>() },
    Function { name: "max", arity: Arity::AtLeast(1), apply: max },
    Function { name: "min", arity: Arity::AtLeast(1), apply: min },
    Function { name: "sinh", arity: Arity::Exactly(1), apply: |a| a[0].sinh() },
    Function { name: "cosh", arity: Arity::Exactly(1), apply: |a| a[0].cosh() },
    Function { name: "tanh", arity: Arity::Exactly(1), apply: |a| a[0].tanh() },
];

pub static CONSTANTS: &[Constant] = &[
    Constant { name: "PI", value: consts::PI },
    Constant { name: "E", value: consts::E },
];

/// Strip an optional `Math.` prefix
pub fn bare_name(name: &str) -> &str {
    name.strip_prefix(NAMESPACE).unwrap_or(name)
}

pub fn function(name: &str) -> Option<&'static Function> {
    let name = bare_name(name);
    FUNCTIONS.iter().find(|f| f.name == name)
}

pub fn constant(name: &str) -> Option<&'static Constant> {
    let name = bare_name(name);
    CONSTANTS.iter().find(|c| c.name == name)
}

/// Canonical spelling of a builtin name, matched case-insensitively
///
/// `"SQRT"` → `"sqrt"`, `"pi"` → `"PI"`. Returns `None` for names outside
/// the allow-list.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    FUNCTIONS
        .iter()
        .map(|f| f.name)
        .chain(CONSTANTS.iter().map(|c| c.name))
        .find(|candidate| candidate.eq_ignore_ascii_case(name))
}

// NaN in any argument propagates, unlike f64::max
fn max(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, |acc, x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            acc.max(x)
        }
    })
}

fn min(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, |acc, x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            acc.min(x)
        }
    })
}

/// Halves round towards +∞: `2.5 → 3`, `-2.5 → -2`
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_and_without_namespace() {
        assert_eq!(function("Math.sqrt").unwrap().name, "sqrt");
        assert_eq!(function("sqrt").unwrap().name, "sqrt");
        assert!(function("Math.eval").is_none());
        assert_eq!(constant("Math.PI").unwrap().value, consts::PI);
        assert!(constant("pi").is_none());
    }

    #[test]
    fn test_canonical_name_is_case_insensitive() {
        assert_eq!(canonical_name("SQRT"), Some("sqrt"));
        assert_eq!(canonical_name("pi"), Some("PI"));
        assert_eq!(canonical_name("e"), Some("E"));
        assert_eq!(canonical_name("exp"), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_max_min_propagate_nan() {
        assert_eq!(max(&[1.0, 7.0, 3.0]), 7.0);
        assert_eq!(min(&[1.0, 7.0, -3.0]), -3.0);
        assert!(max(&[1.0, f64::NAN]).is_nan());
        assert!(min(&[f64::NAN, 1.0]).is_nan());
    }

    #[test]
    fn test_random_in_unit_interval() {
        let random = function("random").unwrap();
        for _ in 0..100 {
            let value = (random.apply)(&[]);
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Exactly(1).accepts(1));
        assert!(!Arity::Exactly(1).accepts(2));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
    }
}
