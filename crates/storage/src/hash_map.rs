//! Hash-indexed storage backend.
//!
//! [`HashMapBackend`] keeps records in a [`HashMap`] keyed by the record key.
//!
//! # Performance Characteristics
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | insert | O(1) amortized |
//! | find_by_key | O(1) average |

use std::collections::HashMap;

use crate::{backend::StorageBackend, error::StorageResult, types::Record};

/// Storage backend over a key → record hash map.
///
/// Inserting a record whose key is already present replaces the earlier
/// record, so the last insert for a key wins.
#[derive(Debug, Clone, Default)]
pub struct HashMapBackend {
    records: HashMap<String, Record>,
}

impl HashMapBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty backend with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: HashMap::with_capacity(capacity) }
    }
}

impl StorageBackend for HashMapBackend {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        self.records.insert(record.key().to_owned(), record);
        Ok(())
    }

    fn find_by_key(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_find() {
        let mut backend = HashMapBackend::new();
        backend.insert(Record::new("0000000007")).expect("insert");

        let found = backend.find_by_key("0000000007").expect("present");
        assert_eq!(found.key(), "0000000007");
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_missing_key_returns_none() {
        let backend = HashMapBackend::new();
        assert!(backend.find_by_key("0000000000").is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_last_insert_wins() {
        let mut backend = HashMapBackend::with_capacity(4);
        backend.insert(Record::with_balance("dup", 1.0)).expect("first insert");
        backend.insert(Record::with_balance("dup", 2.0)).expect("second insert");

        assert_eq!(backend.len(), 1);
        let found = backend.find_by_key("dup").expect("present");
        assert_eq!(found.balance(), 2.0);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut backend = HashMapBackend::new();
        for key in ["0000000003", "0000000001", "0000000002"] {
            backend.insert(Record::new(key)).expect("insert");
        }
        for key in ["0000000001", "0000000002", "0000000003"] {
            assert!(backend.find_by_key(key).is_some(), "{key} should be found");
        }
    }
}
