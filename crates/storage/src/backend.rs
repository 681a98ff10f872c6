//! Storage backend trait definition.
//!
//! This module defines the [`StorageBackend`] trait, the capability every
//! storage strategy implements. The [`Ledger`](crate::Ledger) facade and the
//! benchmark harness are written against this trait so backends can be swapped
//! at construction time without touching callers.
//!
//! # Design Philosophy
//!
//! - **Two operations**: records go in through `insert` and come back out through
//!   `find_by_key`. There is no update or delete.
//! - **Synchronous**: every operation completes in bounded time on the calling thread.
//! - **Misses are not errors**: `find_by_key` returns `None` for an absent key.
//!
//! # Implementing a Backend
//!
//! 1. Implement [`StorageBackend`] for the new type
//! 2. Map rejected inserts to [`StorageError`](crate::StorageError)
//! 3. Run the [`conformance`](crate::conformance) suite against it

use crate::{error::StorageResult, types::Record};

/// Abstract storage backend for keyed records.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`insert`](StorageBackend::insert) | Store a record under its key |
/// | [`find_by_key`](StorageBackend::find_by_key) | Retrieve a record by key |
/// | [`len`](StorageBackend::len) | Number of stored records |
///
/// # Example
///
/// ```
/// use ledger_bench_storage::{HashMapBackend, Record, StorageBackend};
///
/// let mut backend = HashMapBackend::new();
/// backend.insert(Record::new("0000000001")).unwrap();
///
/// let found = backend.find_by_key("0000000001");
/// assert_eq!(found.map(Record::key), Some("0000000001"));
/// assert!(backend.find_by_key("0000000002").is_none());
/// ```
pub trait StorageBackend {
    /// Stores a record.
    ///
    /// Whether an existing record with the same key is replaced depends on
    /// the backend; see each implementation.
    ///
    /// # Errors
    ///
    /// Returns an error only when a backend enforces a precondition on its
    /// input and the record violates it. Neither backend in this crate fails
    /// under its default configuration.
    #[must_use = "storage operations may fail and errors must be handled"]
    fn insert(&mut self, record: Record) -> StorageResult<()>;

    /// Retrieves the record stored under `key`.
    ///
    /// Returns `None` if no record with that key exists. Never mutates the backend.
    fn find_by_key(&self, key: &str) -> Option<&Record>;

    /// Returns the number of stored records.
    fn len(&self) -> usize;

    /// Returns `true` if the backend holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for &mut B {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        (**self).insert(record)
    }

    fn find_by_key(&self, key: &str) -> Option<&Record> {
        (**self).find_by_key(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        (**self).insert(record)
    }

    fn find_by_key(&self, key: &str) -> Option<&Record> {
        (**self).find_by_key(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
