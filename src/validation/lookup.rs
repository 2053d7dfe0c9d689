//! Existence lookups for `exists` rules.

use std::collections::HashSet;

use dashmap::DashMap;
use serde_json::Value;

/// Capability for checking that a referenced record exists.
///
/// The persistence layer owns the real implementation; the validator only
/// receives it as an injected collaborator.
pub trait ExistenceLookup: Send + Sync {
    fn exists(&self, collection: &str, key: &str, value: &Value) -> bool;
}

/// Thread-safe in-memory record index keyed by `(collection, key)`.
#[derive(Debug, Default)]
pub struct InMemoryRecords {
    index: DashMap<(String, String), HashSet<String>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record whose `key` column holds `value`.
    pub fn insert(&self, collection: &str, key: &str, value: &Value) {
        let Some(normalized) = index_key(value) else {
            return;
        };
        self.index
            .entry((collection.to_string(), key.to_string()))
            .or_default()
            .insert(normalized);
    }

    /// Number of records tracked for a `(collection, key)` pair.
    pub fn count(&self, collection: &str, key: &str) -> usize {
        self.index
            .get(&(collection.to_string(), key.to_string()))
            .map(|set| set.len())
            .unwrap_or(0)
    }
}

impl ExistenceLookup for InMemoryRecords {
    fn exists(&self, collection: &str, key: &str, value: &Value) -> bool {
        let Some(normalized) = index_key(value) else {
            return false;
        };
        self.index
            .get(&(collection.to_string(), key.to_string()))
            .is_some_and(|set| set.contains(&normalized))
    }
}

/// Numbers and strings share one key space so `1` and `"1"` match.
fn index_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_lookup() {
        let records = InMemoryRecords::new();
        records.insert("clients", "id", &json!(1));
        records.insert("clients", "id", &json!(2));

        assert!(records.exists("clients", "id", &json!(1)));
        assert!(records.exists("clients", "id", &json!("2")));
        assert!(!records.exists("clients", "id", &json!(3)));
        assert!(!records.exists("contacts", "id", &json!(1)));
        assert_eq!(records.count("clients", "id"), 2);
    }

    #[test]
    fn test_non_scalar_values_never_match() {
        let records = InMemoryRecords::new();
        records.insert("clients", "id", &json!([1]));
        assert_eq!(records.count("clients", "id"), 0);
        assert!(!records.exists("clients", "id", &json!(null)));
    }
}
