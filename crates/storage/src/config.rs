//! Benchmark configuration.
//!
//! [`BenchConfig`] describes one harness run: which backend to measure, how
//! many records to insert, how keys are formatted, and whether keys are staged
//! through a [`CircularQueue`](crate::CircularQueue) first.
//!
//! # Validation
//!
//! - `record_count` must be `>= 1`
//! - `key_width` must be between 1 and [`MAX_KEY_WIDTH`], and wide enough for
//!   the largest identifier (`record_count - 1`)
//! - `stage_capacity`, when set, must be `>= 1`
//! - `metrics_window` must be `>= 1`
//! - `sample_lookups` may be zero; sampled keys are always present
//!
//! # Example
//!
//! ```
//! use ledger_bench_storage::{BackendKind, BenchConfig};
//!
//! let config = BenchConfig::builder()
//!     .backend(BackendKind::HashMap)
//!     .record_count(10_000)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.key_width(), 10);
//! assert_eq!(config.seed(), Some(7));
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    backend_enum::BackendKind,
    error::ConfigError,
    metrics::DEFAULT_HISTOGRAM_WINDOW_SIZE,
    sorted_array::OrderPolicy,
    types::{DEFAULT_KEY_WIDTH, decimal_digits},
};

/// Default number of records inserted per run.
pub const DEFAULT_RECORD_COUNT: u64 = 1_000_000;

/// Widest key the harness will format.
pub const MAX_KEY_WIDTH: usize = 64;

/// Configuration for a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Backend under test.
    #[serde(default)]
    pub(crate) backend: BackendKind,

    /// Number of records to insert.
    #[serde(default = "default_record_count")]
    pub(crate) record_count: u64,

    /// Width keys are zero-padded to.
    #[serde(default = "default_key_width")]
    pub(crate) key_width: usize,

    /// Seed for the key shuffle. `None` seeds from OS entropy.
    #[serde(default)]
    pub(crate) seed: Option<u64>,

    /// Capacity of the staging queue. `None` inserts keys directly.
    #[serde(default)]
    pub(crate) stage_capacity: Option<usize>,

    /// Ordering policy of the sorted-array backend.
    #[serde(default)]
    pub(crate) order_policy: OrderPolicy,

    /// Number of latency samples kept for percentile computation.
    #[serde(default = "default_metrics_window")]
    pub(crate) metrics_window: usize,

    /// Number of extra lookups of random present keys after the fixed probes.
    #[serde(default)]
    pub(crate) sample_lookups: u64,
}

fn default_record_count() -> u64 {
    DEFAULT_RECORD_COUNT
}

fn default_key_width() -> usize {
    DEFAULT_KEY_WIDTH
}

fn default_metrics_window() -> usize {
    DEFAULT_HISTOGRAM_WINDOW_SIZE
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            record_count: DEFAULT_RECORD_COUNT,
            key_width: DEFAULT_KEY_WIDTH,
            seed: None,
            stage_capacity: None,
            order_policy: OrderPolicy::default(),
            metrics_window: DEFAULT_HISTOGRAM_WINDOW_SIZE,
            sample_lookups: 0,
        }
    }
}

#[bon::bon]
impl BenchConfig {
    /// Creates a validated benchmark configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any field is out of range; see the module docs.
    #[builder]
    pub fn new(
        #[builder(default)] backend: BackendKind,
        #[builder(default = DEFAULT_RECORD_COUNT)] record_count: u64,
        #[builder(default = DEFAULT_KEY_WIDTH)] key_width: usize,
        seed: Option<u64>,
        stage_capacity: Option<usize>,
        #[builder(default)] order_policy: OrderPolicy,
        #[builder(default = DEFAULT_HISTOGRAM_WINDOW_SIZE)] metrics_window: usize,
        #[builder(default)] sample_lookups: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            backend,
            record_count,
            key_width,
            seed,
            stage_capacity,
            order_policy,
            metrics_window,
            sample_lookups,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its allowed range.
    ///
    /// Configurations built with [`builder`](Self::builder) are already
    /// validated; this is for values obtained through deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_count == 0 {
            return Err(ConfigError::below_minimum("record_count", 1, self.record_count));
        }
        if self.key_width > MAX_KEY_WIDTH {
            return Err(ConfigError::above_maximum("key_width", MAX_KEY_WIDTH, self.key_width));
        }
        let required = decimal_digits(self.record_count - 1);
        if self.key_width < required {
            return Err(ConfigError::below_minimum("key_width", required, self.key_width));
        }
        if let Some(capacity) = self.stage_capacity.filter(|&c| c == 0) {
            return Err(ConfigError::below_minimum("stage_capacity", 1, capacity));
        }
        if self.metrics_window == 0 {
            return Err(ConfigError::below_minimum("metrics_window", 1, self.metrics_window));
        }
        Ok(())
    }

    /// Returns the backend under test.
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Returns the number of records to insert.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Returns the key width.
    #[must_use]
    pub fn key_width(&self) -> usize {
        self.key_width
    }

    /// Returns the shuffle seed, if fixed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the staging queue capacity, if staging is enabled.
    #[must_use]
    pub fn stage_capacity(&self) -> Option<usize> {
        self.stage_capacity
    }

    /// Returns the sorted-array ordering policy.
    #[must_use]
    pub fn order_policy(&self) -> OrderPolicy {
        self.order_policy
    }

    /// Returns the percentile window size.
    #[must_use]
    pub fn metrics_window(&self) -> usize {
        self.metrics_window
    }

    /// Returns how many random present keys are looked up after the probes.
    #[must_use]
    pub fn sample_lookups(&self) -> u64 {
        self.sample_lookups
    }
}
