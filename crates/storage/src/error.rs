//! Storage, configuration and queue error types.
//!
//! A lookup miss is not an error: backends report it as `None`. The types in
//! this module cover the remaining recoverable conditions.
//!
//! # Error Types
//!
//! - [`StorageError::OutOfOrder`] - A validating sorted backend rejected an insert
//! - [`ConfigError`] - A configuration value is outside its allowed range
//! - [`QueueOverflow`] - A push hit a full [`CircularQueue`](crate::CircularQueue)
//!
//! # Example
//!
//! ```
//! use ledger_bench_storage::{StorageError, StorageResult};
//!
//! fn append(previous: &str, key: &str) -> StorageResult<()> {
//!     if key <= previous {
//!         return Err(StorageError::out_of_order(previous, key));
//!     }
//!     Ok(())
//! }
//!
//! assert!(append("0000000002", "0000000001").is_err());
//! ```

use std::fmt;

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// # Non-exhaustive
///
/// New variants may be added without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// An insert would break the ascending key order of a sorted backend.
    ///
    /// Only produced when the backend runs with
    /// [`OrderPolicy::Validate`](crate::OrderPolicy::Validate). The rejected
    /// record is not stored.
    #[error("Key {key:?} is not greater than the previous key {previous:?}")]
    OutOfOrder {
        /// The last key currently stored.
        previous: String,
        /// The key that was rejected.
        key: String,
    },
}

impl StorageError {
    /// Creates a new `OutOfOrder` error.
    #[must_use]
    pub fn out_of_order(previous: impl Into<String>, key: impl Into<String>) -> Self {
        Self::OutOfOrder { previous: previous.into(), key: key.into() }
    }
}

/// Errors raised when validating configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A value is smaller than the permitted minimum.
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        /// The offending field.
        field: &'static str,
        /// The smallest accepted value.
        min: String,
        /// The value that was supplied.
        value: String,
    },

    /// A value is larger than the permitted maximum.
    #[error("{field} must be at most {max}, got {value}")]
    AboveMaximum {
        /// The offending field.
        field: &'static str,
        /// The largest accepted value.
        max: String,
        /// The value that was supplied.
        value: String,
    },
}

impl ConfigError {
    /// Creates a `BelowMinimum` error.
    #[must_use]
    pub fn below_minimum(
        field: &'static str,
        min: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::BelowMinimum { field, min: min.to_string(), value: value.to_string() }
    }

    /// Creates an `AboveMaximum` error.
    #[must_use]
    pub fn above_maximum(
        field: &'static str,
        max: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::AboveMaximum { field, max: max.to_string(), value: value.to_string() }
    }
}

/// Returned by [`CircularQueue::push`](crate::CircularQueue::push) when the
/// queue is full.
///
/// The rejected item is handed back so the caller can retry after draining.
#[derive(Clone, PartialEq, Eq, Error)]
#[error("queue is full (capacity {capacity})")]
pub struct QueueOverflow<T> {
    /// The item that could not be queued.
    pub item: T,
    /// Capacity of the queue that rejected it.
    pub capacity: usize,
}

impl<T> QueueOverflow<T> {
    /// Consumes the error and returns the rejected item.
    pub fn into_inner(self) -> T {
        self.item
    }
}

// `T` need not be `Debug`.
impl<T> fmt::Debug for QueueOverflow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueOverflow").field("capacity", &self.capacity).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_message() {
        let err = StorageError::out_of_order("0000000005", "0000000003");
        assert_eq!(
            err.to_string(),
            r#"Key "0000000003" is not greater than the previous key "0000000005""#
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::below_minimum("capacity", 1, 0);
        assert_eq!(err.to_string(), "capacity must be at least 1, got 0");

        let err = ConfigError::above_maximum("key_width", 20, 64);
        assert_eq!(err.to_string(), "key_width must be at most 20, got 64");
    }

    #[test]
    fn test_queue_overflow_returns_item() {
        let err = QueueOverflow { item: String::from("X"), capacity: 3 };
        assert_eq!(err.to_string(), "queue is full (capacity 3)");
        assert_eq!(err.into_inner(), "X");
    }
}
