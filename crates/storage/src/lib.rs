//! Storage strategies and the benchmark harness for keyed account records.
//!
//! This crate provides the [`StorageBackend`] trait, two backends that
//! implement it, a fixed-capacity [`CircularQueue`], the [`Ledger`] facade,
//! and a harness that measures insert and lookup latency for each backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Harness                              │
//! │   (key generation, optional queue staging, timed probes)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         Ledger                              │
//! │             register_key / lookup facade                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    StorageBackend trait                     │
//! │               (insert, find_by_key, len)                    │
//! ├──────────────────────────┬──────────────────────────────────┤
//! │      HashMapBackend      │       SortedArrayBackend         │
//! │    (O(1) average find)   │     (binary search, O(log n))    │
//! └──────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use ledger_bench_storage::{Ledger, SortedArrayBackend, format_key};
//!
//! let mut ledger = Ledger::new(SortedArrayBackend::new());
//! for id in 0..100 {
//!     ledger.register_key(format_key(id, 10));
//! }
//!
//! assert!(ledger.lookup("0000000000").is_some());
//! assert!(ledger.lookup("0000000099").is_some());
//! assert!(ledger.lookup("notfound").is_none());
//! ```
//!
//! Running a full measurement:
//!
//! ```
//! use ledger_bench_storage::{BackendKind, BenchConfig, harness};
//!
//! let config = BenchConfig::builder()
//!     .backend(BackendKind::HashMap)
//!     .record_count(1_000)
//!     .build()
//!     .unwrap();
//!
//! let report = harness::run(&config).unwrap();
//! assert_eq!(report.inserted, 1_000);
//! ```
//!
//! # Available Backends
//!
//! | Backend | Lookup | Duplicate keys |
//! |---------|--------|----------------|
//! | [`HashMapBackend`] | O(1) average | last insert wins |
//! | [`SortedArrayBackend`] | O(log n) | kept; requires ascending input |
//!
//! # Error Handling
//!
//! Backend operations return [`StorageResult<T>`]. Lookups never fail: an
//! absent key is `None`. Configuration is validated up front and reported as
//! [`ConfigError`].
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` and `conformance` modules (key generators,
//!   populated backends, assertion macros, the backend contract suite). Enable this in
//!   `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod backend;
pub mod backend_enum;
pub mod config;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod conformance;
pub mod error;
pub mod harness;
pub mod hash_map;
pub mod instrumented;
pub mod ledger;
pub mod metrics;
pub mod queue;
pub mod sorted_array;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

// Re-export primary types at crate root for convenience
pub use backend::StorageBackend;
pub use backend_enum::{Backend, BackendKind, ParseBackendKindError};
pub use config::BenchConfig;
pub use error::{ConfigError, QueueOverflow, StorageError, StorageResult};
pub use harness::{BenchReport, HarnessError, ProbeKind, ProbeResult};
pub use hash_map::HashMapBackend;
pub use instrumented::InstrumentedBackend;
pub use ledger::Ledger;
pub use metrics::{LatencyPercentiles, Metrics, MetricsCollector, MetricsSnapshot};
pub use queue::{CircularQueue, Drain};
pub use sorted_array::{OrderPolicy, SortedArrayBackend};
pub use types::{DEFAULT_KEY_WIDTH, Record, decimal_digits, format_key};
