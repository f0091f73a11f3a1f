//! Evaluator configuration
//!
//! Deserializable from TOML/JSON; every field has a default so an empty
//! document yields `Config::default()`.

use serde::{Deserialize, Serialize};

/// Largest significant-digit count an f64 can meaningfully display
pub const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// What to do with an infinite evaluation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// NaN and ±Infinity both fail with `InvalidResult`
    #[default]
    Reject,
    /// ±Infinity is displayed as `Infinity` / `-Infinity`; NaN still fails
    Display,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Significant digits of the display string (1..=17)
    pub significant_digits: usize,
    pub non_finite: NonFinitePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            significant_digits: 10,
            non_finite: NonFinitePolicy::Reject,
        }
    }
}

impl Config {
    /// Significant digits clamped to the representable range
    pub fn digits(&self) -> usize {
        self.significant_digits.clamp(1, MAX_SIGNIFICANT_DIGITS)
    }

    /// Apply caller-supplied display options on top of this configuration
    ///
    /// `None` keeps the configured digit count; `allow_infinity = false`
    /// keeps the configured policy.
    pub fn with_overrides(
        mut self,
        significant_digits: Option<usize>,
        allow_infinity: bool,
    ) -> Self {
        if let Some(digits) = significant_digits {
            self.significant_digits = digits;
        }
        if allow_infinity {
            self.non_finite = NonFinitePolicy::Display;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.significant_digits, 10);
        assert_eq!(config.non_finite, NonFinitePolicy::Reject);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"non_finite": "display"}"#).unwrap();
        assert_eq!(config.significant_digits, 10);
        assert_eq!(config.non_finite, NonFinitePolicy::Display);
    }

    #[test]
    fn test_digits_clamped() {
        let mut config = Config::default();
        config.significant_digits = 0;
        assert_eq!(config.digits(), 1);
        config.significant_digits = 40;
        assert_eq!(config.digits(), MAX_SIGNIFICANT_DIGITS);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(4), true);
        assert_eq!(config.significant_digits, 4);
        assert_eq!(config.non_finite, NonFinitePolicy::Display);

        let file = Config {
            significant_digits: 6,
            non_finite: NonFinitePolicy::Display,
        };
        assert_eq!(file.clone().with_overrides(None, false), file);
    }
}
