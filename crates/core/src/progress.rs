//! Progress Record
//!
//! The durable history of every attempt, keyed by topic name. The stored
//! document has two shapes of value:
//!
//! ```json
//! {
//!     "Storytelling": {
//!         "1": { "response": "...", "feedback": "..." },
//!         "2": { "response": "...", "feedback": "..." }
//!     },
//!     "presentation": { "response": "...", "feedback": "..." }
//! }
//! ```
//!
//! Topics accumulate numbered attempts; the reserved `presentation` key holds
//! only the most recent assessment. Top-level key order is kept as found in
//! the document, with new keys appended at the end.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved key for the latest presentation assessment.
pub const PRESENTATION_KEY: &str = "presentation";

/// One user response and the feedback it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attempt {
    pub response: String,
    pub feedback: String,
}

impl Attempt {
    pub fn new(response: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            feedback: feedback.into(),
        }
    }
}

/// The value stored under one top-level key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEntry {
    /// Attempts in sequence order; attempt `n` sits at index `n - 1`.
    Attempts(Vec<Attempt>),
    /// A single overwritten slot (used by presentation assessments).
    Latest(Attempt),
}

impl ProgressEntry {
    /// The attempts held by this entry, oldest first.
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            ProgressEntry::Attempts(attempts) => attempts,
            ProgressEntry::Latest(attempt) => std::slice::from_ref(attempt),
        }
    }
}

/// Every attempt the user has made, across all topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    entries: Vec<(String, ProgressEntry)>,
}

impl ProgressRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&ProgressEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry)
    }

    /// Past attempts for `topic`, oldest first. Empty if the topic is unknown.
    pub fn attempts(&self, topic: &str) -> &[Attempt] {
        self.get(topic).map(ProgressEntry::attempts).unwrap_or(&[])
    }

    /// Appends an attempt under `topic` and returns its sequence number.
    ///
    /// The sequence number is one more than the number of attempts already
    /// stored for the topic, so numbering starts at 1 and has no gaps. A key
    /// that currently holds a single slot becomes a series starting with it.
    pub fn append_attempt(&mut self, topic: &str, attempt: Attempt) -> u32 {
        let index = match self.entries.iter().position(|(k, _)| k == topic) {
            Some(index) => index,
            None => {
                self.entries
                    .push((topic.to_string(), ProgressEntry::Attempts(Vec::new())));
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index].1;
        let mut attempts = match std::mem::replace(entry, ProgressEntry::Attempts(Vec::new())) {
            ProgressEntry::Attempts(attempts) => attempts,
            ProgressEntry::Latest(existing) => vec![existing],
        };
        attempts.push(attempt);
        let sequence = attempts.len() as u32;
        *entry = ProgressEntry::Attempts(attempts);
        sequence
    }

    /// Replaces the presentation slot with `attempt`.
    pub fn set_presentation(&mut self, attempt: Attempt) {
        self.set(PRESENTATION_KEY, ProgressEntry::Latest(attempt));
    }

    /// The most recent presentation assessment, if any.
    pub fn presentation(&self) -> Option<&Attempt> {
        match self.get(PRESENTATION_KEY)? {
            ProgressEntry::Latest(attempt) => Some(attempt),
            ProgressEntry::Attempts(attempts) => attempts.last(),
        }
    }

    /// Inserts or replaces `key`, keeping the position of an existing key.
    fn set(&mut self, key: &str, entry: ProgressEntry) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((key.to_string(), entry)),
        }
    }
}

impl Serialize for ProgressEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProgressEntry::Latest(attempt) => attempt.serialize(serializer),
            ProgressEntry::Attempts(attempts) => {
                let mut map = serializer.serialize_map(Some(attempts.len()))?;
                for (index, attempt) in attempts.iter().enumerate() {
                    map.serialize_entry(&(index + 1).to_string(), attempt)?;
                }
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Latest(Attempt),
    Numbered(std::collections::BTreeMap<String, Attempt>),
}

impl<'de> Deserialize<'de> for ProgressEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let numbered = match RawEntry::deserialize(deserializer)? {
            RawEntry::Latest(attempt) => return Ok(ProgressEntry::Latest(attempt)),
            RawEntry::Numbered(numbered) => numbered,
        };

        let mut attempts = numbered
            .into_iter()
            .map(|(key, attempt)| {
                key.parse::<u32>().map(|n| (n, attempt)).map_err(|_| {
                    de::Error::custom(format!("attempt key '{key}' is not a sequence number"))
                })
            })
            .collect::<Result<Vec<_>, D::Error>>()?;
        attempts.sort_by_key(|(n, _)| *n);

        for (index, (n, _)) in attempts.iter().enumerate() {
            if *n as usize != index + 1 {
                return Err(de::Error::custom(format!(
                    "attempt numbers must run 1..={} without gaps, found {n}",
                    attempts.len()
                )));
            }
        }

        Ok(ProgressEntry::Attempts(
            attempts.into_iter().map(|(_, attempt)| attempt).collect(),
        ))
    }
}

impl Serialize for ProgressRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = ProgressRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from topic name to attempts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = ProgressRecord::new();
        while let Some((key, entry)) = access.next_entry::<String, ProgressEntry>()? {
            record.set(&key, entry);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for ProgressRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_numbers_start_at_one_without_gaps() {
        let mut record = ProgressRecord::new();
        let numbers: Vec<u32> = (0..5)
            .map(|i| record.append_attempt("Storytelling", Attempt::new(format!("r{i}"), "f")))
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(record.attempts("Storytelling").len(), 5);
        assert_eq!(record.attempts("Storytelling")[2].response, "r2");
    }

    #[test]
    fn test_sequences_are_per_topic() {
        let mut record = ProgressRecord::new();
        assert_eq!(record.append_attempt("Storytelling", Attempt::new("a", "b")), 1);
        assert_eq!(record.append_attempt("Conflict Resolution", Attempt::new("a", "b")), 1);
        assert_eq!(record.append_attempt("Storytelling", Attempt::new("a", "b")), 2);
    }

    #[test]
    fn test_presentation_overwrites_in_place() {
        let mut record = ProgressRecord::new();
        record.set_presentation(Attempt::new("first", "ok"));
        record.append_attempt("Storytelling", Attempt::new("s", "f"));
        record.set_presentation(Attempt::new("second", "better"));

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["presentation", "Storytelling"]);
        assert_eq!(record.presentation(), Some(&Attempt::new("second", "better")));
    }

    #[test]
    fn test_serialized_layout() {
        let mut record = ProgressRecord::new();
        record.append_attempt("Impromptu Speaking", Attempt::new("Hello world", "Score: 7/10, improve pacing."));
        record.set_presentation(Attempt::new("Slides", "Good"));

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "Impromptu Speaking": {
                    "1": { "response": "Hello world", "feedback": "Score: 7/10, improve pacing." }
                },
                "presentation": { "response": "Slides", "feedback": "Good" }
            })
        );
    }

    #[test]
    fn test_attempts_are_ordered_numerically_on_load() {
        let text = r#"{"Storytelling": {"10": {"response": "j", "feedback": "10"},
            "1": {"response": "a", "feedback": "1"}, "2": {"response": "b", "feedback": "2"},
            "3": {"response": "c", "feedback": "3"}, "4": {"response": "d", "feedback": "4"},
            "5": {"response": "e", "feedback": "5"}, "6": {"response": "f", "feedback": "6"},
            "7": {"response": "g", "feedback": "7"}, "8": {"response": "h", "feedback": "8"},
            "9": {"response": "i", "feedback": "9"}}}"#;
        let record: ProgressRecord = serde_json::from_str(text).unwrap();
        let feedback: Vec<&str> = record
            .attempts("Storytelling")
            .iter()
            .map(|a| a.feedback.as_str())
            .collect();
        assert_eq!(feedback, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
    }

    #[test]
    fn test_key_order_is_preserved_on_load() {
        let text = r#"{"Storytelling": {}, "presentation": {"response": "p", "feedback": "q"}, "Conflict Resolution": {}}"#;
        let record: ProgressRecord = serde_json::from_str(text).unwrap();
        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["Storytelling", "presentation", "Conflict Resolution"]
        );
        assert!(record.attempts("Storytelling").is_empty());
    }

    #[test]
    fn test_rejects_gaps_and_non_numeric_keys() {
        let gap = r#"{"Storytelling": {"1": {"response": "a", "feedback": "b"}, "3": {"response": "a", "feedback": "b"}}}"#;
        assert!(serde_json::from_str::<ProgressRecord>(gap).is_err());

        let word = r#"{"Storytelling": {"first": {"response": "a", "feedback": "b"}}}"#;
        assert!(serde_json::from_str::<ProgressRecord>(word).is_err());
    }

    #[test]
    fn test_append_to_single_slot_becomes_series() {
        let mut record: ProgressRecord =
            serde_json::from_str(r#"{"Storytelling": {"response": "old", "feedback": "x"}}"#).unwrap();
        assert_eq!(record.append_attempt("Storytelling", Attempt::new("new", "y")), 2);
        assert_eq!(record.attempts("Storytelling")[0].response, "old");
    }
}
