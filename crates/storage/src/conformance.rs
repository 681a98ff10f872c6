//! Conformance test suite for [`StorageBackend`] implementations.
//!
//! Each function here checks one aspect of the trait contract. Every backend
//! runs the same suite, so a new strategy only needs to be plugged into
//! `tests/conformance.rs` to be held to the same behavior.
//!
//! Inserts are always issued in ascending key order, which every backend
//! must accept. Behavior under unsorted input is backend-specific and is
//! covered by each backend's own unit tests.
//!
//! # Usage
//!
//! Enable the `testutil` feature and call each conformance function with a
//! fresh backend, or a factory for checks that need several:
//!
//! ```no_run
//! use ledger_bench_storage::{HashMapBackend, conformance};
//!
//! #[test]
//! fn lookup_missing_key_on_empty() {
//!     conformance::lookup_missing_key_on_empty(&HashMapBackend::new());
//! }
//! ```
//!
//! # Test Categories
//!
//! | Category | Functions | Contract aspect |
//! |----------|-----------|-----------------|
//! | Lookup | 7 tests | Exact-match `find_by_key` semantics |
//! | Length | 2 tests | `len` / `is_empty` bookkeeping |
//! | Ledger | 2 tests | Facade over an injected backend |

use crate::{
    assert_storage_ok,
    backend::StorageBackend,
    harness::ABSENT_KEY,
    ledger::Ledger,
    testutil::{make_key, populate},
    types::Record,
};

// ============================================================================
// Lookup: exact-match find_by_key semantics (7 tests)
// ============================================================================

/// `find_by_key` on an empty backend returns `None`.
pub fn lookup_missing_key_on_empty<B: StorageBackend>(backend: &B) {
    assert!(backend.find_by_key(&make_key(0)).is_none(), "empty backend must find nothing");
    assert!(backend.find_by_key("").is_none(), "empty key on empty backend");
}

/// A single inserted record can be found and carries its balance.
pub fn lookup_single_record<B: StorageBackend>(backend: &mut B) {
    assert_storage_ok!(backend.insert(Record::with_balance("0000000007", 12.5)));
    let found = backend.find_by_key("0000000007").expect("inserted record must be found");
    assert_eq!(found.key(), "0000000007");
    assert_eq!(found.balance(), 12.5);
}

/// The smallest and largest keys of an ascending run are both found.
pub fn lookup_first_and_last<B: StorageBackend>(backend: &mut B) {
    populate(backend, 1_000);
    assert!(backend.find_by_key(&make_key(0)).is_some(), "first key");
    assert!(backend.find_by_key(&make_key(999)).is_some(), "last key");
}

/// Every key is found for every backend length from 1 to 17.
///
/// Covers odd and even lengths, so every midpoint rounding case is hit.
pub fn lookup_every_key_for_small_lengths<B, F>(make: F)
where
    B: StorageBackend,
    F: Fn() -> B,
{
    for len in 1..=17u64 {
        let mut backend = make();
        populate(&mut backend, len);
        for i in 0..len {
            let key = make_key(i);
            let found = backend.find_by_key(&key);
            assert_eq!(
                found.map(Record::key),
                Some(key.as_str()),
                "key {i} missing from backend of length {len}"
            );
        }
    }
}

/// Keys below, between, and above the stored range are absent.
pub fn lookup_absent_keys<B: StorageBackend>(backend: &mut B) {
    for idx in [10, 20, 30] {
        assert_storage_ok!(backend.insert(Record::new(make_key(idx))));
    }
    for idx in [0, 15, 25, 99] {
        assert!(backend.find_by_key(&make_key(idx)).is_none(), "key {idx} was never inserted");
    }
    assert!(backend.find_by_key(ABSENT_KEY).is_none(), "{ABSENT_KEY} must be absent");
}

/// Matching is exact: prefixes and extensions of a stored key are absent.
pub fn lookup_is_exact_match<B: StorageBackend>(backend: &mut B) {
    assert_storage_ok!(backend.insert(Record::new("abc")));
    assert!(backend.find_by_key("ab").is_none());
    assert!(backend.find_by_key("abcd").is_none());
    assert!(backend.find_by_key("ABC").is_none());
    assert!(backend.find_by_key("abc").is_some());
}

/// The returned record is the one stored under that key.
pub fn lookup_returns_matching_record<B: StorageBackend>(backend: &mut B) {
    populate(backend, 50);
    for i in [0u64, 1, 24, 25, 49] {
        let record = backend.find_by_key(&make_key(i)).expect("present");
        assert_eq!(record.balance(), i as f64, "record for key {i}");
    }
}

// ============================================================================
// Length: len / is_empty bookkeeping (2 tests)
// ============================================================================

/// A fresh backend is empty.
pub fn length_fresh_backend_is_empty<B: StorageBackend>(backend: &B) {
    assert_eq!(backend.len(), 0);
    assert!(backend.is_empty());
}

/// `len` grows by one per accepted insert of a distinct key.
pub fn length_tracks_inserts<B: StorageBackend>(backend: &mut B) {
    for i in 0..10 {
        assert_eq!(backend.len(), i as usize);
        assert_storage_ok!(backend.insert(Record::new(make_key(i))));
    }
    assert_eq!(backend.len(), 10);
    assert!(!backend.is_empty());
}

// ============================================================================
// Ledger: facade over an injected backend (2 tests)
// ============================================================================

/// Keys registered through a [`Ledger`] are found with a zero balance.
pub fn ledger_register_then_lookup<B: StorageBackend>(backend: B) {
    let mut ledger = Ledger::new(backend);
    assert!(ledger.register_key(make_key(0)));
    assert!(ledger.register_key(make_key(1)));

    let record = ledger.lookup(&make_key(1)).expect("registered");
    assert_eq!(record.balance(), 0.0);
    assert!(ledger.lookup(ABSENT_KEY).is_none());
    assert_eq!(ledger.len(), 2);
}

/// A [`Ledger`] over an empty backend finds nothing.
pub fn ledger_empty_lookup<B: StorageBackend>(backend: B) {
    let ledger = Ledger::new(backend);
    assert!(ledger.is_empty());
    assert!(ledger.lookup(&make_key(0)).is_none());
}

// ============================================================================
// Runner
// ============================================================================

/// Runs every conformance check, building a fresh backend for each with `make`.
pub fn run_all<B, F>(make: F)
where
    B: StorageBackend,
    F: Fn() -> B,
{
    lookup_missing_key_on_empty(&make());
    lookup_single_record(&mut make());
    lookup_first_and_last(&mut make());
    lookup_every_key_for_small_lengths(&make);
    lookup_absent_keys(&mut make());
    lookup_is_exact_match(&mut make());
    lookup_returns_matching_record(&mut make());

    length_fresh_backend_is_empty(&make());
    length_tracks_inserts(&mut make());

    ledger_register_then_lookup(make());
    ledger_empty_lookup(make());
}
