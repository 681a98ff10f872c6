//! Shared test utilities for storage backend testing.
//!
//! This module provides helpers for generating keys, building populated
//! backends, and asserting on [`StorageResult`] values. It is feature-gated
//! behind `testutil` to keep it out of production builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! ledger-bench-storage = { path = "../storage", features = ["testutil"] }
//! ```
//!
//! Then import helpers:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use ledger_bench_storage::testutil::{make_key, populated_sorted_array};
//! ```

use crate::{
    StorageBackend,
    error::{StorageError, StorageResult},
    hash_map::HashMapBackend,
    sorted_array::SortedArrayBackend,
    types::{DEFAULT_KEY_WIDTH, Record, format_key},
};

/// Create a deterministic test key for `idx`.
///
/// Produces keys like `"0000000042"`, zero-padded to [`DEFAULT_KEY_WIDTH`] so
/// lexicographic order matches numeric order.
#[must_use]
pub fn make_key(idx: u64) -> String {
    format_key(idx, DEFAULT_KEY_WIDTH)
}

/// Keys `0..count` in ascending order.
pub fn ascending_keys(count: u64) -> impl Iterator<Item = String> {
    (0..count).map(make_key)
}

/// Insert [`ascending_keys`] into `backend`, each with a balance equal to its index.
///
/// # Panics
///
/// Panics if any insert fails.
pub fn populate<B: StorageBackend>(backend: &mut B, count: u64) {
    for (idx, key) in ascending_keys(count).enumerate() {
        backend
            .insert(Record::with_balance(key, idx as f64))
            .expect("populate insert failed");
    }
}

/// Create a [`HashMapBackend`] holding `count` keys.
#[must_use]
pub fn populated_hash_map(count: u64) -> HashMapBackend {
    let mut backend = HashMapBackend::with_capacity(count as usize);
    populate(&mut backend, count);
    backend
}

/// Create a [`SortedArrayBackend`] holding `count` keys in ascending order.
#[must_use]
pub fn populated_sorted_array(count: u64) -> SortedArrayBackend {
    let mut backend = SortedArrayBackend::with_capacity(count as usize);
    populate(&mut backend, count);
    backend
}

/// Assert that a [`StorageResult`] is a [`StorageError::OutOfOrder`].
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use ledger_bench_storage::assert_out_of_order;
/// use ledger_bench_storage::error::{StorageError, StorageResult};
///
/// let result: StorageResult<()> = Err(StorageError::out_of_order("b", "a"));
/// assert_out_of_order!(result);
/// ```
#[macro_export]
macro_rules! assert_out_of_order {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::error::StorageError::OutOfOrder { .. })),
            "expected StorageError::OutOfOrder, got: {:?}",
            $result,
        );
    };
    ($result:expr, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::StorageError::OutOfOrder { .. })),
            "{}: expected StorageError::OutOfOrder, got: {:?}",
            $msg,
            $result,
        );
    };
}

/// Unwraps a [`StorageResult`], panicking with the error's message on failure.
///
/// The optional second argument names the operation in the panic message.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use ledger_bench_storage::{Record, SortedArrayBackend, StorageBackend, assert_storage_ok};
///
/// let mut backend = SortedArrayBackend::new();
/// assert_storage_ok!(backend.insert(Record::new("0000000001")), "first insert");
/// ```
#[macro_export]
macro_rules! assert_storage_ok {
    ($result:expr) => {
        $crate::assert_storage_ok!($result, "storage operation")
    };
    ($result:expr, $what:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!("{} failed: {err}", $what),
        }
    };
}

/// Returns `true` if `result` is an ordering violation.
pub fn is_out_of_order<T>(result: &StorageResult<T>) -> bool {
    matches!(result, Err(StorageError::OutOfOrder { .. }))
}
