//! Ledger facade over an injected storage backend.
//!
//! [`Ledger`] turns raw keys into [`Record`]s and forwards them to the backend
//! it was constructed with. The backend is chosen by the caller and never
//! swapped for the Ledger's lifetime.
//!
//! # Example
//!
//! ```
//! use ledger_bench_storage::{HashMapBackend, Ledger};
//!
//! let mut ledger = Ledger::new(HashMapBackend::new());
//! assert!(ledger.register_key("0000000001"));
//!
//! assert!(ledger.lookup("0000000001").is_some());
//! assert!(ledger.lookup("notfound").is_none());
//! ```
//!
//! The Ledger can also borrow a backend the caller keeps ownership of:
//!
//! ```
//! use ledger_bench_storage::{Ledger, SortedArrayBackend, StorageBackend};
//!
//! let mut backend = SortedArrayBackend::new();
//! {
//!     let mut ledger = Ledger::new(&mut backend);
//!     ledger.register_key("a");
//!     ledger.register_key("b");
//! }
//! assert_eq!(backend.len(), 2);
//! ```

use tracing::warn;

use crate::{backend::StorageBackend, types::Record};

/// Facade that registers keys into, and looks records up from, one backend.
#[derive(Debug, Clone, Default)]
pub struct Ledger<B> {
    backend: B,
}

impl<B: StorageBackend> Ledger<B> {
    /// Creates a Ledger that owns `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Registers a new record with a zero balance under `key`.
    ///
    /// Returns `true` when the backend stored the record. The hash backend and
    /// a trusting sorted backend always accept; a validating sorted backend
    /// rejects keys that break ascending order, which is logged and reported
    /// as `false`.
    pub fn register_key(&mut self, key: impl Into<String>) -> bool {
        match self.backend.insert(Record::new(key)) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Backend rejected record");
                false
            },
        }
    }

    /// Returns the record stored under `key`, or `None` if it is absent.
    pub fn lookup(&self, key: &str) -> Option<&Record> {
        self.backend.find_by_key(key)
    }

    /// Returns the number of registered records.
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the Ledger and returns its backend.
    pub fn into_inner(self) -> B {
        self.backend
    }
}
