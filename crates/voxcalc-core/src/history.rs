//! Calculation history — append-only record of completed calculations
//!
//! The core never keeps a history on its own; callers own a [`History`]
//! and decide how long to retain it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed calculation as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// The phrase as spoken or typed
    pub expression: String,
    /// Display string of the result
    pub result: String,
    pub created_at: DateTime<Utc>,
}

impl CalculationRecord {
    /// Record stamped with the current time
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        CalculationRecord {
            expression: expression.into(),
            result: result.into(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only list of calculation records, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<CalculationRecord>,
}

impl History {
    pub fn new() -> Self {
        History {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: CalculationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&CalculationRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CalculationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a CalculationRecord;
    type IntoIter = std::slice::Iter<'a, CalculationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_starts_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.last().is_none());
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut history = History::default();
        history.push(CalculationRecord::new("two plus two", "4"));
        history.push(CalculationRecord::new("five factorial", "120"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.records()[0].expression, "two plus two");
        assert_eq!(history.last().unwrap().result, "120");

        let results: Vec<&str> = history.iter().map(|r| r.result.as_str()).collect();
        assert_eq!(results, vec!["4", "120"]);
    }

    #[test]
    fn test_records_are_timestamped_in_order() {
        let mut history = History::new();
        history.push(CalculationRecord::new("one", "1"));
        history.push(CalculationRecord::new("two", "2"));
        assert!(history.records()[0].created_at <= history.records()[1].created_at);
    }

    #[test]
    fn test_history_serializes_as_array() {
        let mut history = History::new();
        history.push(CalculationRecord::new("two plus two", "4"));

        let json = serde_json::to_value(&history).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["expression"], "two plus two");
        assert_eq!(records[0]["result"], "4");
        // RFC 3339 timestamp
        assert!(records[0]["created_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_history_roundtrips_through_json() {
        let mut history = History::new();
        history.push(CalculationRecord::new("दो जोड़ तीन", "5"));
        let json = serde_json::to_string(&history).unwrap();
        let back: History = serde_json::from_str(&json).unwrap();
        assert_eq!(history, back);
    }
}
