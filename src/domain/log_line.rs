use crate::normalizer::truncate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A normalized log line ready for assembly into a batch document.
///
/// Field order and names match the ingestion wire format:
/// `{"timestamp": .., "line": .., "app": .., "level": .., "meta": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLine {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub line: String,
    pub app: String,
    pub level: String,
    pub meta: Meta,
}

/// Attribute map attached to a line.
///
/// Every value is truncated to the configured ceiling as it is inserted, so a
/// `Meta` never holds an oversized value regardless of where the entry came
/// from. Later inserts overwrite earlier ones with the same key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta {
    #[serde(skip)]
    max_value_len: Option<usize>,
    entries: HashMap<String, String>,
}

impl Meta {
    pub fn with_value_limit(max_value_len: usize) -> Self {
        Self {
            max_value_len: Some(max_value_len),
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: &str) {
        let value = match self.max_value_len {
            Some(max) => truncate(value, max),
            None => value,
        };
        self.entries.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// The value limit is a construction detail; two maps are equal when their entries are.
impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_truncates_on_insert() {
        let mut meta = Meta::with_value_limit(4);
        meta.insert("key", "abcdefgh");
        assert_eq!(meta.get("key"), Some("abcd"));
    }

    #[test]
    fn test_meta_later_insert_overwrites() {
        let mut meta = Meta::with_value_limit(64);
        meta.insert("hostname", "from-resource");
        meta.insert("hostname", "from-record");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("hostname"), Some("from-record"));
    }

    #[test]
    fn test_line_serializes_wire_shape() {
        let mut meta = Meta::with_value_limit(64);
        meta.insert("hostname", "web-1");
        let line = NormalizedLine {
            timestamp: 1_700_000_000_000,
            line: "hello".to_string(),
            app: "api".to_string(),
            level: "info".to_string(),
            meta,
        };

        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":1700000000000,"line":"hello","app":"api","level":"info","meta":{"hostname":"web-1"}}"#
        );
    }
}
