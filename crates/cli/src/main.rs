//! Ledger benchmark CLI
//!
//! Measures bulk insertion and lookup latency of one storage backend.
//!
//! # Usage
//!
//! ```bash
//! # One million records into the sorted-array backend
//! ledger-bench --backend sorted
//!
//! # Hash backend, reproducible shuffle, JSON report
//! ledger-bench --backend hash --records 100000 --seed 42 --json
//!
//! # Stage keys through a 4096-slot queue and reject out-of-order keys
//! ledger-bench --backend sorted --stage-capacity 4096 --validate-order
//!
//! # Start from a JSON config file, overriding the record count
//! ledger-bench --config bench.json --records 5000
//! ```

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use ledger_bench_storage::{BackendKind, BenchConfig, OrderPolicy, harness};

#[derive(Parser, Debug)]
#[command(name = "ledger-bench")]
#[command(about = "Time inserts and lookups against a keyed record store")]
#[command(version)]
struct Cli {
    /// Storage backend to measure (hash or sorted)
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Number of records to insert [default: 1000000]
    #[arg(short, long)]
    records: Option<u64>,

    /// Width keys are zero-padded to [default: 10]
    #[arg(long)]
    key_width: Option<usize>,

    /// Seed for the key shuffle (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stage keys through a circular queue of this capacity
    #[arg(long)]
    stage_capacity: Option<usize>,

    /// Reject keys that arrive out of order at the sorted backend
    #[arg(long)]
    validate_order: bool,

    /// Extra lookups of random present keys after the fixed probes [default: 0]
    #[arg(long)]
    sample_lookups: Option<u64>,

    /// JSON benchmark configuration; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Merges the optional config file with command-line overrides.
    fn bench_config(&self) -> anyhow::Result<BenchConfig> {
        let base = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str::<BenchConfig>(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            },
            None => BenchConfig::default(),
        };

        let order_policy =
            if self.validate_order { OrderPolicy::Validate } else { base.order_policy() };

        let config = BenchConfig::builder()
            .backend(self.backend.unwrap_or(base.backend()))
            .record_count(self.records.unwrap_or(base.record_count()))
            .key_width(self.key_width.unwrap_or(base.key_width()))
            .maybe_seed(self.seed.or(base.seed()))
            .maybe_stage_capacity(self.stage_capacity.or(base.stage_capacity()))
            .order_policy(order_policy)
            .metrics_window(base.metrics_window())
            .sample_lookups(self.sample_lookups.unwrap_or(base.sample_lookups()))
            .build()
            .context("Invalid benchmark configuration")?;
        Ok(config)
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.bench_config()?;
    tracing::info!(
        backend = %config.backend(),
        records = config.record_count(),
        key_width = config.key_width(),
        "Starting benchmark"
    );

    let report = harness::run(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
