//! Latency metrics for storage operations.
//!
//! This module records, per operation type (insert and lookup):
//!
//! - Operation counts
//! - Cumulative latency in nanoseconds
//! - p50/p95/p99 latency percentiles over a bounded window of recent samples
//! - Lookup hits and misses, and rejected inserts
//!
//! # Memory Ordering
//!
//! All counters are independent and use `Ordering::Relaxed`. A snapshot reads
//! them one after another, so counters may be mutually inconsistent by a few
//! operations if recording continues during the snapshot.
//!
//! # Percentile Tracking
//!
//! Each operation type keeps a `LatencyHistogram`: a circular buffer of the
//! most recent samples (1024 by default). Recording overwrites the oldest
//! sample once the buffer is full. Percentiles are computed at snapshot time
//! by sorting a copy of the buffer, keeping the recording path O(1).
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use ledger_bench_storage::metrics::Metrics;
//!
//! let metrics = Metrics::new();
//!
//! metrics.record_insert(Duration::from_nanos(100));
//! metrics.record_lookup(Duration::from_nanos(40), true);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.insert_count, 1);
//! assert_eq!(snapshot.lookup_hits, 1);
//! assert_eq!(snapshot.lookup_percentiles.p50, 40);
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

/// Default number of latency samples retained per operation type.
pub const DEFAULT_HISTOGRAM_WINDOW_SIZE: usize = 1024;

// ── LatencyPercentiles ──────────────────────────────────────────────────

/// Latency percentiles for a single operation type, in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    /// 50th percentile (median) latency in nanoseconds.
    pub p50: u64,
    /// 95th percentile latency in nanoseconds.
    pub p95: u64,
    /// 99th percentile latency in nanoseconds.
    pub p99: u64,
}

// ── LatencyHistogram ────────────────────────────────────────────────────

/// A bounded circular buffer of latency samples for streaming percentile computation.
///
/// Records the most recent `capacity` latency values. Older values are
/// overwritten when the buffer is full.
pub(crate) struct LatencyHistogram {
    inner: Mutex<HistogramInner>,
}

struct HistogramInner {
    /// Circular buffer of latency samples.
    buf: Vec<u64>,
    /// Next write position in the circular buffer.
    pos: usize,
    /// Maximum number of samples to retain.
    capacity: usize,
}

impl LatencyHistogram {
    /// Creates a new histogram with the given window size (at least one sample).
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(HistogramInner {
                buf: Vec::with_capacity(capacity),
                pos: 0,
                capacity,
            }),
        }
    }

    /// Records a latency sample in nanoseconds.
    pub(crate) fn record(&self, value_ns: u64) {
        let mut inner = self.inner.lock();
        let pos = inner.pos;
        if inner.buf.len() < inner.capacity {
            inner.buf.push(value_ns);
        } else {
            inner.buf[pos] = value_ns;
        }
        inner.pos = (pos + 1) % inner.capacity;
    }

    /// Computes p50, p95, p99 from the current buffer contents.
    ///
    /// Returns all zeros if no samples have been recorded.
    pub(crate) fn percentiles(&self) -> LatencyPercentiles {
        let inner = self.inner.lock();
        if inner.buf.is_empty() {
            return LatencyPercentiles::default();
        }
        let mut sorted = inner.buf.clone();
        drop(inner);
        sorted.sort_unstable();
        let len = sorted.len();
        LatencyPercentiles {
            p50: sorted[percentile_index(len, 50)],
            p95: sorted[percentile_index(len, 95)],
            p99: sorted[percentile_index(len, 99)],
        }
    }
}

/// Index of a percentile in a sorted array of `len` elements.
///
/// Nearest-rank method: `ceil(percentile/100 * len) - 1`, clamped to the valid range.
fn percentile_index(len: usize, percentile: u32) -> usize {
    if len == 0 {
        return 0;
    }
    let rank = (u64::from(percentile) * len as u64).div_ceil(100) as usize;
    rank.saturating_sub(1).min(len - 1)
}

/// Converts a duration to whole nanoseconds, saturating at `u64::MAX`.
pub(crate) fn as_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

// ── MetricsSnapshot ─────────────────────────────────────────────────────

/// Point-in-time copy of all counters, suitable for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Total inserts attempted.
    pub insert_count: u64,
    /// Inserts rejected by the backend.
    pub rejected_inserts: u64,
    /// Total lookups.
    pub lookup_count: u64,
    /// Lookups that found a record.
    pub lookup_hits: u64,
    /// Lookups that found nothing.
    pub lookup_misses: u64,
    /// Cumulative insert latency in nanoseconds.
    pub insert_latency_ns: u64,
    /// Cumulative lookup latency in nanoseconds.
    pub lookup_latency_ns: u64,
    /// Insert latency percentiles over the recent window.
    pub insert_percentiles: LatencyPercentiles,
    /// Lookup latency percentiles over the recent window.
    pub lookup_percentiles: LatencyPercentiles,
}

impl MetricsSnapshot {
    /// Average insert latency in nanoseconds.
    #[must_use]
    pub fn avg_insert_latency_ns(&self) -> f64 {
        if self.insert_count == 0 {
            0.0
        } else {
            self.insert_latency_ns as f64 / self.insert_count as f64
        }
    }

    /// Average lookup latency in nanoseconds.
    #[must_use]
    pub fn avg_lookup_latency_ns(&self) -> f64 {
        if self.lookup_count == 0 {
            0.0
        } else {
            self.lookup_latency_ns as f64 / self.lookup_count as f64
        }
    }

    /// Fraction of lookups that found a record.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.lookup_count == 0 { 0.0 } else { self.lookup_hits as f64 / self.lookup_count as f64 }
    }

    /// Total operations of every type.
    #[must_use]
    pub fn total_operations(&self) -> u64 {
        self.insert_count + self.lookup_count
    }
}

// ── Metrics ─────────────────────────────────────────────────────────────

/// Collects operation counts and latencies for a storage backend.
///
/// Cheap to clone; clones share the same counters.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    insert_count: AtomicU64,
    rejected_inserts: AtomicU64,
    lookup_count: AtomicU64,
    lookup_hits: AtomicU64,
    lookup_misses: AtomicU64,

    insert_latency_ns: AtomicU64,
    lookup_latency_ns: AtomicU64,

    insert_histogram: LatencyHistogram,
    lookup_histogram: LatencyHistogram,
}

impl Metrics {
    /// Creates a collector with the default percentile window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(DEFAULT_HISTOGRAM_WINDOW_SIZE)
    }

    /// Creates a collector that keeps the `window` most recent samples per
    /// operation type for percentile computation.
    #[must_use]
    pub fn with_window(window: usize) -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                insert_count: AtomicU64::new(0),
                rejected_inserts: AtomicU64::new(0),
                lookup_count: AtomicU64::new(0),
                lookup_hits: AtomicU64::new(0),
                lookup_misses: AtomicU64::new(0),
                insert_latency_ns: AtomicU64::new(0),
                lookup_latency_ns: AtomicU64::new(0),
                insert_histogram: LatencyHistogram::new(window),
                lookup_histogram: LatencyHistogram::new(window),
            }),
        }
    }

    /// Records an insert.
    pub fn record_insert(&self, duration: Duration) {
        let ns = as_nanos(duration);
        self.inner.insert_count.fetch_add(1, Ordering::Relaxed);
        self.inner.insert_latency_ns.fetch_add(ns, Ordering::Relaxed);
        self.inner.insert_histogram.record(ns);
    }

    /// Records `count` inserts that were timed together as one batch.
    ///
    /// Counters grow by `count` and by the whole `duration`. The histogram
    /// receives a single sample: the per-insert average of the batch.
    pub fn record_bulk_insert(&self, count: u64, duration: Duration) {
        if count == 0 {
            return;
        }
        let ns = as_nanos(duration);
        self.inner.insert_count.fetch_add(count, Ordering::Relaxed);
        self.inner.insert_latency_ns.fetch_add(ns, Ordering::Relaxed);
        self.inner.insert_histogram.record(ns / count);
    }

    /// Records an insert that the backend rejected.
    pub fn record_rejected_insert(&self) {
        self.inner.rejected_inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup and whether it found a record.
    pub fn record_lookup(&self, duration: Duration, hit: bool) {
        let ns = as_nanos(duration);
        self.inner.lookup_count.fetch_add(1, Ordering::Relaxed);
        self.inner.lookup_latency_ns.fetch_add(ns, Ordering::Relaxed);
        self.inner.lookup_histogram.record(ns);
        if hit {
            self.inner.lookup_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.lookup_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns a snapshot of the current counters and percentiles.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            insert_count: self.inner.insert_count.load(Ordering::Relaxed),
            rejected_inserts: self.inner.rejected_inserts.load(Ordering::Relaxed),
            lookup_count: self.inner.lookup_count.load(Ordering::Relaxed),
            lookup_hits: self.inner.lookup_hits.load(Ordering::Relaxed),
            lookup_misses: self.inner.lookup_misses.load(Ordering::Relaxed),
            insert_latency_ns: self.inner.insert_latency_ns.load(Ordering::Relaxed),
            lookup_latency_ns: self.inner.lookup_latency_ns.load(Ordering::Relaxed),
            insert_percentiles: self.inner.insert_histogram.percentiles(),
            lookup_percentiles: self.inner.lookup_histogram.percentiles(),
        }
    }

    /// Logs the current snapshot at INFO level.
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();

        if snapshot.total_operations() == 0 {
            return;
        }

        info!(
            insert_count = snapshot.insert_count,
            lookup_count = snapshot.lookup_count,
            avg_insert_latency_ns = snapshot.avg_insert_latency_ns(),
            avg_lookup_latency_ns = snapshot.avg_lookup_latency_ns(),
            insert_p50 = snapshot.insert_percentiles.p50,
            insert_p99 = snapshot.insert_percentiles.p99,
            lookup_p50 = snapshot.lookup_percentiles.p50,
            lookup_p99 = snapshot.lookup_percentiles.p99,
            hit_rate = snapshot.hit_rate(),
            "Storage metrics snapshot"
        );

        if snapshot.rejected_inserts > 0 {
            warn!(
                rejected_inserts = snapshot.rejected_inserts,
                insert_count = snapshot.insert_count,
                "Backend rejected inserts"
            );
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").field("snapshot", &self.snapshot()).finish()
    }
}

/// Exposes the [`Metrics`] instance of an instrumented component.
pub trait MetricsCollector {
    /// Returns the component's metrics collector.
    fn metrics(&self) -> &Metrics;
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── LatencyHistogram ────────────────────────────────────────────────

    #[test]
    fn test_histogram_empty_percentiles() {
        let h = LatencyHistogram::new(16);
        assert_eq!(h.percentiles(), LatencyPercentiles::default());
    }

    #[test]
    fn test_histogram_zero_window_keeps_one_sample() {
        let h = LatencyHistogram::new(0);
        h.record(5);
        h.record(7);
        assert_eq!(h.percentiles().p50, 7);
    }

    #[test]
    fn test_percentiles_of_three_samples() {
        // A harness run without samples records exactly three lookups.
        let h = LatencyHistogram::new(DEFAULT_HISTOGRAM_WINDOW_SIZE);
        for ns in [300, 100, 200] {
            h.record(ns);
        }
        let p = h.percentiles();
        assert_eq!((p.p50, p.p95, p.p99), (200, 300, 300));
    }

    #[test]
    fn test_percentile_index_bounds() {
        assert_eq!(percentile_index(0, 99), 0);
        assert_eq!(percentile_index(3, 50), 1);
        assert_eq!(percentile_index(3, 99), 2);
        assert_eq!(percentile_index(1_000, 95), 949);
    }

    // ── Metrics ─────────────────────────────────────────────────────────

    #[test]
    fn test_lookup_window_only_keeps_recent_samples() {
        let metrics = Metrics::with_window(4);
        // Four slow lookups are pushed out of the window by four fast ones.
        for _ in 0..4 {
            metrics.record_lookup(Duration::from_nanos(1_000), true);
        }
        for ns in 1..=4 {
            metrics.record_lookup(Duration::from_nanos(ns), false);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.lookup_count, 8, "counters are not windowed");
        assert_eq!(snapshot.lookup_latency_ns, 4_010);
        assert_eq!(snapshot.lookup_percentiles.p99, 4);
        assert_eq!(snapshot.hit_rate(), 0.5);
    }

    #[test]
    fn test_bulk_insert_records_count_and_average() {
        let metrics = Metrics::new();
        metrics.record_bulk_insert(1_000, Duration::from_micros(50));
        metrics.record_rejected_insert();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.insert_count, 1_000);
        assert_eq!(snapshot.insert_latency_ns, 50_000);
        assert_eq!(snapshot.avg_insert_latency_ns(), 50.0);
        assert_eq!(snapshot.insert_percentiles.p50, 50);
        assert_eq!(snapshot.rejected_inserts, 1);
        assert_eq!(snapshot.total_operations(), 1_000);
    }

    #[test]
    fn test_empty_bulk_insert_is_ignored() {
        let metrics = Metrics::new();
        metrics.record_bulk_insert(0, Duration::from_micros(5));
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_single_inserts_and_lookups() {
        let metrics = Metrics::new();
        metrics.record_insert(Duration::from_nanos(300));
        metrics.record_lookup(Duration::from_nanos(40), true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.insert_count, 1);
        assert_eq!(snapshot.avg_insert_latency_ns(), 300.0);
        assert_eq!(snapshot.lookup_hits, 1);
        assert_eq!(snapshot.lookup_misses, 0);
    }

    #[test]
    fn test_empty_snapshot_averages_are_zero() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.avg_insert_latency_ns(), 0.0);
        assert_eq!(snapshot.avg_lookup_latency_ns(), 0.0);
        assert_eq!(snapshot.hit_rate(), 0.0);
        assert_eq!(snapshot.total_operations(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();
        clone.record_insert(Duration::from_nanos(1));
        clone.record_rejected_insert();
        assert_eq!(metrics.snapshot().insert_count, 1);
        assert_eq!(metrics.snapshot().rejected_inserts, 1);
    }
}
