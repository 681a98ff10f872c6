//! Sorted-array storage backend.
//!
//! [`SortedArrayBackend`] appends records to a [`Vec`] and finds them again
//! with a binary search. It never sorts: the caller must insert records in
//! ascending key order.
//!
//! # Caller Contract
//!
//! Records must arrive in strictly increasing key order. Under the default
//! [`OrderPolicy::Trust`] the backend does not check this; an out-of-order or
//! duplicate key is stored anyway and later lookups may miss records that are
//! present. Under [`OrderPolicy::Validate`] each insert is compared with the
//! last stored key and violations are rejected with
//! [`StorageError::OutOfOrder`].
//!
//! # Performance Characteristics
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | insert | O(1) amortized |
//! | find_by_key | O(log n) |

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    backend::StorageBackend,
    error::{StorageError, StorageResult},
    types::Record,
};

/// How a [`SortedArrayBackend`] treats the ascending-order contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Append without checking. Fastest; the caller guarantees ordering.
    #[default]
    Trust,
    /// Reject any key that is not strictly greater than the last stored key.
    Validate,
}

/// Storage backend over an append-only, caller-sorted sequence.
///
/// # Example
///
/// ```
/// use ledger_bench_storage::{Record, SortedArrayBackend, StorageBackend};
///
/// let mut backend = SortedArrayBackend::new();
/// for id in 0..10 {
///     backend.insert(Record::new(format!("{id:010}"))).unwrap();
/// }
///
/// assert!(backend.find_by_key("0000000000").is_some());
/// assert!(backend.find_by_key("0000000009").is_some());
/// assert!(backend.find_by_key("notfound").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SortedArrayBackend {
    records: Vec<Record>,
    policy: OrderPolicy,
}

impl SortedArrayBackend {
    /// Creates an empty backend that trusts the caller's ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty backend with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity), policy: OrderPolicy::default() }
    }

    /// Sets the ordering policy.
    #[must_use]
    pub fn with_policy(mut self, policy: OrderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the ordering policy.
    #[must_use]
    pub fn policy(&self) -> OrderPolicy {
        self.policy
    }

    /// Returns `true` if the stored keys are in non-decreasing order.
    ///
    /// Lookups are only reliable while this holds.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.records.is_sorted_by(|a, b| a.key() <= b.key())
    }

    /// Binary search over the stored keys.
    ///
    /// `high` is kept one past the last candidate so an empty sequence yields
    /// `low == high == 0` and the loop body never runs.
    fn search(&self, key: &str) -> Option<usize> {
        let mut low = 0;
        let mut high = self.records.len();

        while low < high {
            let mid = low + (high - low) / 2;
            match self.records[mid].key().cmp(key) {
                Ordering::Equal => return Some(mid),
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
            }
        }

        None
    }
}

impl StorageBackend for SortedArrayBackend {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        if self.policy == OrderPolicy::Validate {
            if let Some(last) = self.records.last().filter(|last| record.key() <= last.key()) {
                debug!(previous = last.key(), key = record.key(), "Rejected out-of-order insert");
                return Err(StorageError::out_of_order(last.key(), record.key()));
            }
        }

        self.records.push(record);
        Ok(())
    }

    fn find_by_key(&self, key: &str) -> Option<&Record> {
        self.search(key).map(|idx| &self.records[idx])
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
