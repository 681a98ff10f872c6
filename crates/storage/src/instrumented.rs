//! Timing wrapper for storage backends.
//!
//! [`InstrumentedBackend`] wraps any [`StorageBackend`] and records the
//! wall-clock latency of every `insert` and `find_by_key` into a shared
//! [`Metrics`] collector. Results are passed through unchanged.
//!
//! # Usage
//!
//! ```
//! use ledger_bench_storage::{
//!     HashMapBackend, InstrumentedBackend, Ledger, metrics::{Metrics, MetricsCollector},
//! };
//!
//! let metrics = Metrics::new();
//! let backend = InstrumentedBackend::new(HashMapBackend::new(), metrics.clone());
//! let mut ledger = Ledger::new(backend);
//!
//! ledger.register_key("0000000001");
//! ledger.lookup("0000000001");
//! ledger.lookup("notfound");
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.insert_count, 1);
//! assert_eq!(snapshot.lookup_hits, 1);
//! assert_eq!(snapshot.lookup_misses, 1);
//! ```

use std::time::Instant;

use crate::{
    backend::StorageBackend,
    error::StorageResult,
    metrics::{Metrics, MetricsCollector},
    types::Record,
};

/// A [`StorageBackend`] decorator that times each operation.
#[derive(Debug)]
pub struct InstrumentedBackend<B> {
    inner: B,
    metrics: Metrics,
}

impl<B: StorageBackend> InstrumentedBackend<B> {
    /// Wraps `inner`, recording into `metrics`.
    pub fn new(inner: B, metrics: Metrics) -> Self {
        Self { inner, metrics }
    }

    /// Returns a reference to the wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwraps the decorator, returning the wrapped backend.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: StorageBackend> StorageBackend for InstrumentedBackend<B> {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        let start = Instant::now();
        let result = self.inner.insert(record);
        self.metrics.record_insert(start.elapsed());
        if result.is_err() {
            self.metrics.record_rejected_insert();
        }
        result
    }

    fn find_by_key(&self, key: &str) -> Option<&Record> {
        let start = Instant::now();
        let found = self.inner.find_by_key(key);
        self.metrics.record_lookup(start.elapsed(), found.is_some());
        found
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<B> MetricsCollector for InstrumentedBackend<B> {
    fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
