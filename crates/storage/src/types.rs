//! Common types used across storage operations.
//!
//! This module defines the [`Record`] stored by every backend and the
//! key-formatting helpers used to build fixed-width keys.

use serde::{Deserialize, Serialize};

/// Default width of a zero-padded key (`"0000000042"`).
pub const DEFAULT_KEY_WIDTH: usize = 10;

/// A keyed record held by a storage backend.
///
/// The key is the record's identity. The balance is opaque payload that the
/// storage layer never inspects. Records are immutable once constructed.
///
/// # Examples
///
/// ```
/// use ledger_bench_storage::Record;
///
/// let record = Record::new("0000000042");
/// assert_eq!(record.key(), "0000000042");
/// assert_eq!(record.balance(), 0.0);
///
/// let funded = Record::with_balance("0000000043", 125.5);
/// assert_eq!(funded.balance(), 125.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    key: String,
    balance: f64,
}

impl Record {
    /// Creates a record with a zero balance.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_balance(key, 0.0)
    }

    /// Creates a record with the given balance.
    #[must_use]
    pub fn with_balance(key: impl Into<String>, balance: f64) -> Self {
        Self { key: key.into(), balance }
    }

    /// Returns the record's key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the record's balance.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.balance
    }
}

/// Formats a numeric identifier as a decimal key left-padded with `'0'`.
///
/// Padding to a constant width makes lexicographic and numeric ordering
/// coincide. Identifiers with more digits than `width` are returned unpadded
/// and unchanged.
///
/// # Examples
///
/// ```
/// use ledger_bench_storage::format_key;
///
/// assert_eq!(format_key(42, 10), "0000000042");
/// assert_eq!(format_key(123_456, 3), "123456");
/// ```
#[must_use]
pub fn format_key(id: u64, width: usize) -> String {
    format!("{id:0width$}")
}

/// Returns the number of decimal digits needed to print `id`.
#[must_use]
pub fn decimal_digits(id: u64) -> usize {
    id.checked_ilog10().map_or(1, |d| d as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_to_zero_balance() {
        let record = Record::new("0000000000");
        assert_eq!(record.key(), "0000000000");
        assert_eq!(record.balance(), 0.0);
    }

    #[test]
    fn test_format_key_pads_to_width() {
        assert_eq!(format_key(0, DEFAULT_KEY_WIDTH), "0000000000");
        assert_eq!(format_key(999_999, DEFAULT_KEY_WIDTH), "0000999999");
        assert_eq!(format_key(7, 1), "7");
    }

    #[test]
    fn test_padded_keys_sort_numerically() {
        let k9 = format_key(9, DEFAULT_KEY_WIDTH);
        let k10 = format_key(10, DEFAULT_KEY_WIDTH);
        let k100 = format_key(100, DEFAULT_KEY_WIDTH);
        assert!(k9 < k10);
        assert!(k10 < k100);
    }

    #[test]
    fn test_decimal_digits() {
        assert_eq!(decimal_digits(0), 1);
        assert_eq!(decimal_digits(9), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(999_999), 6);
        assert_eq!(decimal_digits(u64::MAX), 20);
    }
}
