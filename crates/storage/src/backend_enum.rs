//! Unified backend enum for runtime selection.
//!
//! [`Backend`] wraps each storage strategy in this crate so the harness can
//! pick one from configuration while still dispatching statically through a
//! `match`.
//!
//! # Available Backends
//!
//! | Variant | Lookup | Insert order |
//! |---------|--------|--------------|
//! | [`Backend::HashMap`] | O(1) average | any |
//! | [`Backend::SortedArray`] | O(log n) | ascending, caller-maintained |
//!
//! # Usage
//!
//! ```
//! use ledger_bench_storage::{Backend, BackendKind, Record, StorageBackend};
//!
//! let mut backend = Backend::from_kind(BackendKind::HashMap);
//! backend.insert(Record::new("key")).unwrap();
//! assert!(backend.find_by_key("key").is_some());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    HashMapBackend, Record, SortedArrayBackend, StorageBackend, StorageResult,
    sorted_array::OrderPolicy,
};

/// Identifies a storage strategy without constructing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// [`HashMapBackend`].
    HashMap,
    /// [`SortedArrayBackend`].
    #[default]
    SortedArray,
}

impl BackendKind {
    /// Every kind, in display order.
    pub const ALL: [BackendKind; 2] = [BackendKind::HashMap, BackendKind::SortedArray];

    /// Returns the kind's stable name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HashMap => "hash_map",
            Self::SortedArray => "sorted_array",
        }
    }

    /// Returns `true` if this backend requires keys in ascending order.
    #[must_use]
    pub fn requires_sorted_input(self) -> bool {
        matches!(self, Self::SortedArray)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend {0:?} (expected one of: hash_map, sorted_array)")]
pub struct ParseBackendKindError(String);

impl FromStr for BackendKind {
    type Err = ParseBackendKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash_map" | "hash" | "map" => Ok(Self::HashMap),
            "sorted_array" | "sorted" | "vector" => Ok(Self::SortedArray),
            other => Err(ParseBackendKindError(other.to_owned())),
        }
    }
}

/// Unified storage backend enum.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Hash-indexed backend.
    HashMap(HashMapBackend),
    /// Sorted-array backend.
    SortedArray(SortedArrayBackend),
}

impl Backend {
    /// Creates an empty backend of the given kind with default settings.
    #[must_use]
    pub fn from_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::HashMap => Self::HashMap(HashMapBackend::new()),
            BackendKind::SortedArray => Self::SortedArray(SortedArrayBackend::new()),
        }
    }

    /// Creates an empty backend sized for `capacity` records.
    ///
    /// `policy` only applies to the sorted-array backend.
    #[must_use]
    pub fn with_capacity(kind: BackendKind, capacity: usize, policy: OrderPolicy) -> Self {
        match kind {
            BackendKind::HashMap => Self::HashMap(HashMapBackend::with_capacity(capacity)),
            BackendKind::SortedArray => {
                Self::SortedArray(SortedArrayBackend::with_capacity(capacity).with_policy(policy))
            },
        }
    }

    /// Returns which strategy this backend uses.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::HashMap(_) => BackendKind::HashMap,
            Self::SortedArray(_) => BackendKind::SortedArray,
        }
    }
}

impl StorageBackend for Backend {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        match self {
            Self::HashMap(b) => b.insert(record),
            Self::SortedArray(b) => b.insert(record),
        }
    }

    fn find_by_key(&self, key: &str) -> Option<&Record> {
        match self {
            Self::HashMap(b) => b.find_by_key(key),
            Self::SortedArray(b) => b.find_by_key(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::HashMap(b) => b.len(),
            Self::SortedArray(b) => b.len(),
        }
    }
}
