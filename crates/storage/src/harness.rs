//! Benchmark driver.
//!
//! [`run`] performs one measurement:
//!
//! 1. Generate identifiers `0..record_count` and shuffle them
//! 2. Format each as a zero-padded key
//! 3. Sort the keys if the backend requires ascending input
//! 4. Insert every key through a [`Ledger`], optionally staging them through a
//!    [`CircularQueue`] first, and time the whole phase
//! 5. Time three probe lookups: the first key in key space, the last key, and
//!    a key that was never inserted
//! 6. Optionally time a number of random lookups of present keys
//!
//! The returned [`BenchReport`] serializes to JSON and its `Display` output
//! prints one line per measurement.

use std::{
    fmt,
    hint::black_box,
    time::{Duration, Instant},
};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    backend::StorageBackend,
    backend_enum::Backend,
    config::BenchConfig,
    error::ConfigError,
    ledger::Ledger,
    metrics::{Metrics, MetricsSnapshot, as_nanos},
    queue::CircularQueue,
    types::format_key,
};

/// Key probed to measure a lookup miss. It sorts after every zero-padded
/// decimal key.
pub const ABSENT_KEY: &str = "notfound";

/// Errors returned by [`run`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Which of the three fixed probes a [`ProbeResult`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// Smallest key in the key space.
    First,
    /// Largest key in the key space.
    Last,
    /// A key that was never inserted.
    Absent,
}

/// Outcome of one timed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Which probe this was.
    pub kind: ProbeKind,
    /// The key looked up.
    pub key: String,
    /// Whether a record was found.
    pub found: bool,
    /// Lookup latency in nanoseconds.
    pub elapsed_ns: u64,
}

/// Result of a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// Configuration the run used.
    pub config: BenchConfig,
    /// Seed actually used for the shuffle.
    pub seed: u64,
    /// Records the backend accepted.
    pub inserted: u64,
    /// Records the backend rejected.
    pub rejected: u64,
    /// Wall-clock time of the whole insert phase in nanoseconds.
    pub insert_elapsed_ns: u64,
    /// The three fixed probes, in order first, last, absent.
    pub probes: Vec<ProbeResult>,
    /// Insert counters over the bulk insert, and lookup counters and
    /// percentiles over probes and sampled lookups.
    pub metrics: MetricsSnapshot,
}

impl BenchReport {
    /// Returns the probe of the given kind.
    #[must_use]
    pub fn probe(&self, kind: ProbeKind) -> Option<&ProbeResult> {
        self.probes.iter().find(|p| p.kind == kind)
    }

    /// Average insert time per record in nanoseconds.
    #[must_use]
    pub fn avg_insert_ns(&self) -> f64 {
        let total = self.inserted + self.rejected;
        if total == 0 { 0.0 } else { self.insert_elapsed_ns as f64 / total as f64 }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Adding accounts took: {} nanoseconds", self.insert_elapsed_ns)?;
        for probe in &self.probes {
            if probe.found {
                writeln!(f, "{} took: {} nanoseconds", probe.key, probe.elapsed_ns)?;
                continue;
            }
            match probe.kind {
                ProbeKind::First => writeln!(f, "First account not found!")?,
                ProbeKind::Last => writeln!(f, "Last account not found!")?,
                ProbeKind::Absent => writeln!(f, "Account '{}' not found!", probe.key)?,
            }
        }
        Ok(())
    }
}

/// Generates keys `0..count` formatted to `width`, in random order.
pub fn shuffled_keys<R: Rng + ?Sized>(count: u64, width: usize, rng: &mut R) -> Vec<String> {
    let mut ids: Vec<u64> = (0..count).collect();
    ids.shuffle(rng);
    ids.into_iter().map(|id| format_key(id, width)).collect()
}

/// Runs one benchmark as described by `config`.
///
/// # Errors
///
/// Returns [`HarnessError::Config`] if `config` fails validation.
#[instrument(skip_all, fields(backend = %config.backend(), records = config.record_count()))]
pub fn run(config: &BenchConfig) -> Result<BenchReport, HarnessError> {
    config.validate()?;

    let seed = config.seed().unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut keys = shuffled_keys(config.record_count(), config.key_width(), &mut rng);
    if config.backend().requires_sorted_input() {
        debug!("Sorting keys for ascending-order backend");
        keys.sort_unstable();
    }

    let mut queue = config.stage_capacity().map(CircularQueue::new).transpose()?;

    let capacity = usize::try_from(config.record_count()).unwrap_or(usize::MAX);
    let backend = Backend::with_capacity(config.backend(), capacity, config.order_policy());
    let mut ledger = Ledger::new(backend);

    let metrics = Metrics::with_window(config.metrics_window());
    let (outcome, insert_elapsed) = insert_phase(&mut ledger, keys, queue.as_mut(), &metrics);
    if outcome.rejected > 0 {
        warn!(rejected = outcome.rejected, "Some records were rejected during insertion");
    }

    let probes = lookup_phase(&ledger, config, &metrics);
    sample_phase(&ledger, config, &mut rng, &metrics);

    metrics.log_metrics();

    let report = BenchReport {
        config: config.clone(),
        seed,
        inserted: outcome.inserted,
        rejected: outcome.rejected,
        insert_elapsed_ns: as_nanos(insert_elapsed),
        probes,
        metrics: metrics.snapshot(),
    };

    info!(
        seed,
        inserted = report.inserted,
        insert_elapsed_ns = report.insert_elapsed_ns,
        "Benchmark complete"
    );
    Ok(report)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct InsertOutcome {
    inserted: u64,
    rejected: u64,
}

impl InsertOutcome {
    fn tally(&mut self, accepted: bool, metrics: &Metrics) {
        if accepted {
            self.inserted += 1;
        } else {
            self.rejected += 1;
            metrics.record_rejected_insert();
        }
    }

    fn attempted(&self) -> u64 {
        self.inserted + self.rejected
    }
}

#[instrument(skip_all, fields(staged = queue.is_some()))]
fn insert_phase<B: StorageBackend>(
    ledger: &mut Ledger<B>,
    keys: Vec<String>,
    queue: Option<&mut CircularQueue<String>>,
    metrics: &Metrics,
) -> (InsertOutcome, Duration) {
    let mut outcome = InsertOutcome::default();
    let start = Instant::now();

    match queue {
        Some(queue) => {
            for key in keys {
                if let Err(overflow) = queue.push(key) {
                    flush(ledger, queue, &mut outcome, metrics);
                    // Freshly drained, so this push fits unless it is rejected again.
                    if let Err(overflow) = queue.push(overflow.into_inner()) {
                        outcome.tally(ledger.register_key(overflow.into_inner()), metrics);
                    }
                }
            }
            flush(ledger, queue, &mut outcome, metrics);
        },
        None => {
            for key in keys {
                outcome.tally(ledger.register_key(key), metrics);
            }
        },
    }

    let elapsed = start.elapsed();
    metrics.record_bulk_insert(outcome.attempted(), elapsed);
    debug!(inserted = outcome.inserted, elapsed_ns = as_nanos(elapsed), "Insert phase done");
    (outcome, elapsed)
}

fn flush<B: StorageBackend>(
    ledger: &mut Ledger<B>,
    queue: &mut CircularQueue<String>,
    outcome: &mut InsertOutcome,
    metrics: &Metrics,
) {
    for key in queue.drain() {
        outcome.tally(ledger.register_key(key), metrics);
    }
}

#[instrument(skip_all)]
fn lookup_phase<B: StorageBackend>(
    ledger: &Ledger<B>,
    config: &BenchConfig,
    metrics: &Metrics,
) -> Vec<ProbeResult> {
    let width = config.key_width();
    let probes = [
        (ProbeKind::First, format_key(0, width)),
        (ProbeKind::Last, format_key(config.record_count() - 1, width)),
        (ProbeKind::Absent, ABSENT_KEY.to_owned()),
    ];

    probes
        .into_iter()
        .map(|(kind, key)| {
            let (found, elapsed) = timed_lookup(ledger, &key);
            metrics.record_lookup(elapsed, found);
            debug!(?kind, key = %key, found, "Probe lookup");
            ProbeResult { kind, key, found, elapsed_ns: as_nanos(elapsed) }
        })
        .collect()
}

#[instrument(skip_all, fields(samples = config.sample_lookups()))]
fn sample_phase<B: StorageBackend>(
    ledger: &Ledger<B>,
    config: &BenchConfig,
    rng: &mut StdRng,
    metrics: &Metrics,
) {
    for _ in 0..config.sample_lookups() {
        let key = format_key(rng.gen_range(0..config.record_count()), config.key_width());
        let (found, elapsed) = timed_lookup(ledger, &key);
        metrics.record_lookup(elapsed, found);
    }
}

fn timed_lookup<B: StorageBackend>(ledger: &Ledger<B>, key: &str) -> (bool, Duration) {
    let start = Instant::now();
    let found = black_box(ledger.lookup(black_box(key))).is_some();
    (found, start.elapsed())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{backend_enum::BackendKind, sorted_array::OrderPolicy};

    fn small(backend: BackendKind) -> BenchConfig {
        BenchConfig::builder().backend(backend).record_count(1_000).seed(11).build().unwrap()
    }

    #[test]
    fn test_shuffled_keys_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut keys = shuffled_keys(100, 10, &mut rng);
        assert_eq!(keys.len(), 100);
        keys.sort();
        let expected: Vec<String> = (0..100).map(|id| format_key(id, 10)).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let a = shuffled_keys(50, 10, &mut StdRng::seed_from_u64(9));
        let b = shuffled_keys(50, 10, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_finds_first_and_last_for_both_backends() {
        for kind in BackendKind::ALL {
            let report = run(&small(kind)).unwrap();
            assert_eq!(report.inserted, 1_000, "{kind}");
            assert_eq!(report.rejected, 0, "{kind}");
            assert!(report.probe(ProbeKind::First).unwrap().found, "{kind}");
            assert!(report.probe(ProbeKind::Last).unwrap().found, "{kind}");
            assert!(!report.probe(ProbeKind::Absent).unwrap().found, "{kind}");
            assert_eq!(report.metrics.lookup_count, 3, "{kind}");
            assert_eq!(report.metrics.lookup_hits, 2, "{kind}");
            assert_eq!(report.seed, 11);
        }
    }

    #[test]
    fn test_report_insert_counters_match_outcome() {
        for kind in BackendKind::ALL {
            let report = run(&small(kind)).unwrap();
            let snapshot = &report.metrics;
            assert_eq!(snapshot.insert_count, report.inserted + report.rejected, "{kind}");
            assert_eq!(snapshot.rejected_inserts, report.rejected, "{kind}");
            assert_eq!(snapshot.insert_latency_ns, report.insert_elapsed_ns, "{kind}");
            assert_eq!(
                snapshot.insert_percentiles.p50,
                report.insert_elapsed_ns / report.inserted,
                "{kind}"
            );
        }
    }

    fn validating_ledger() -> Ledger<Backend> {
        Ledger::new(Backend::with_capacity(BackendKind::SortedArray, 4, OrderPolicy::Validate))
    }

    fn unsorted_keys() -> Vec<String> {
        ["0000000002", "0000000001", "0000000003", "0000000000"].map(String::from).to_vec()
    }

    #[test]
    fn test_insert_phase_counts_rejections_in_metrics() {
        let mut ledger = validating_ledger();
        let metrics = Metrics::new();

        let (outcome, elapsed) = insert_phase(&mut ledger, unsorted_keys(), None, &metrics);

        assert_eq!(outcome, InsertOutcome { inserted: 2, rejected: 2 });
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.insert_count, 4);
        assert_eq!(snapshot.rejected_inserts, 2);
        assert_eq!(snapshot.insert_latency_ns, as_nanos(elapsed));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_staged_insert_phase_counts_rejections_in_metrics() {
        let mut ledger = validating_ledger();
        let mut queue = CircularQueue::new(3).unwrap();
        let metrics = Metrics::new();

        let (outcome, _) =
            insert_phase(&mut ledger, unsorted_keys(), Some(&mut queue), &metrics);

        assert_eq!(outcome, InsertOutcome { inserted: 2, rejected: 2 });
        assert_eq!(metrics.snapshot().rejected_inserts, 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_run_with_staging_queue() {
        let config = BenchConfig::builder()
            .backend(BackendKind::SortedArray)
            .record_count(100)
            .stage_capacity(7)
            .order_policy(OrderPolicy::Validate)
            .seed(3)
            .build()
            .unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.inserted, 100);
        assert_eq!(report.rejected, 0, "staging must preserve FIFO order");
        assert!(report.probe(ProbeKind::Last).unwrap().found);
    }

    #[test]
    fn test_run_samples_present_keys() {
        let config = BenchConfig::builder()
            .backend(BackendKind::HashMap)
            .record_count(64)
            .sample_lookups(20)
            .build()
            .unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.metrics.lookup_count, 23);
        assert_eq!(report.metrics.lookup_hits, 22);
    }

    #[test]
    fn test_run_rejects_invalid_deserialized_config() {
        let config: BenchConfig = serde_json::from_str(r#"{"record_count":0}"#).unwrap();
        assert!(matches!(run(&config), Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_display_matches_driver_output() {
        let report = BenchReport {
            config: BenchConfig::default(),
            seed: 0,
            inserted: 2,
            rejected: 0,
            insert_elapsed_ns: 1_500,
            probes: vec![
                ProbeResult {
                    kind: ProbeKind::First,
                    key: "0000000000".into(),
                    found: true,
                    elapsed_ns: 40,
                },
                ProbeResult {
                    kind: ProbeKind::Last,
                    key: "0000000001".into(),
                    found: false,
                    elapsed_ns: 30,
                },
                ProbeResult {
                    kind: ProbeKind::Absent,
                    key: ABSENT_KEY.into(),
                    found: false,
                    elapsed_ns: 20,
                },
            ],
            metrics: MetricsSnapshot::default(),
        };

        assert_eq!(
            report.to_string(),
            "Adding accounts took: 1500 nanoseconds\n\
             0000000000 took: 40 nanoseconds\n\
             Last account not found!\n\
             Account 'notfound' not found!\n"
        );
        assert_eq!(report.avg_insert_ns(), 750.0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = run(&small(BackendKind::HashMap)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["backend"], "hash_map");
        assert_eq!(json["probes"][2]["kind"], "absent");
        assert_eq!(json["inserted"], 1_000);
    }
}
