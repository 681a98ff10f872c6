#![allow(clippy::expect_used)]

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ledger_bench_storage::{
    Backend, BackendKind, CircularQueue, OrderPolicy, Record, StorageBackend, format_key,
};

const KEY_WIDTH: usize = 10;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_key(idx: u64) -> String {
    format_key(idx, KEY_WIDTH)
}

/// Creates a backend of `kind` holding keys `0..count` inserted in ascending order.
fn populated_backend(kind: BackendKind, count: u64) -> Backend {
    let mut backend = Backend::with_capacity(kind, count as usize, OrderPolicy::Trust);
    for i in 0..count {
        backend.insert(Record::new(make_key(i))).expect("populate insert failed");
    }
    backend
}

// ---------------------------------------------------------------------------
// 1. insert_operations
// ---------------------------------------------------------------------------

fn insert_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_operations");

    for &count in &[1_000u64, 100_000] {
        let keys: Vec<String> = (0..count).map(make_key).collect();
        group.throughput(Throughput::Elements(count));

        for kind in BackendKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.as_str(), count), &keys, |b, keys| {
                b.iter_batched(
                    || (Backend::with_capacity(kind, keys.len(), OrderPolicy::Trust), keys.clone()),
                    |(mut backend, keys)| {
                        for key in keys {
                            backend.insert(Record::new(key)).expect("insert failed");
                        }
                        backend
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 2. lookup_operations
// ---------------------------------------------------------------------------

fn lookup_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_operations");

    for &count in &[1_000u64, 1_000_000] {
        for kind in BackendKind::ALL {
            let backend = populated_backend(kind, count);
            let first = make_key(0);
            let last = make_key(count - 1);

            group.bench_function(BenchmarkId::new(format!("{kind}/first"), count), |b| {
                b.iter(|| black_box(backend.find_by_key(black_box(&first))));
            });
            group.bench_function(BenchmarkId::new(format!("{kind}/last"), count), |b| {
                b.iter(|| black_box(backend.find_by_key(black_box(&last))));
            });
            group.bench_function(BenchmarkId::new(format!("{kind}/missing"), count), |b| {
                b.iter(|| black_box(backend.find_by_key(black_box("notfound"))));
            });
        }
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 3. queue_operations
// ---------------------------------------------------------------------------

fn queue_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_operations");

    for &capacity in &[16usize, 1024] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::new("fill_then_drain", capacity),
            &capacity,
            |b, &capacity| {
                let mut queue = CircularQueue::new(capacity).expect("capacity is non-zero");
                b.iter(|| {
                    for i in 0..capacity {
                        queue.push(i).expect("queue has room");
                    }
                    while let Some(item) = queue.pop() {
                        black_box(item);
                    }
                });
            },
        );
    }

    group.bench_function("push_pop_steady_state", |b| {
        let mut queue = CircularQueue::new(64).expect("capacity is non-zero");
        for i in 0..32u64 {
            queue.push(i).expect("queue has room");
        }
        b.iter(|| {
            queue.push(black_box(7)).expect("queue has room");
            black_box(queue.pop());
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Group registration
// ---------------------------------------------------------------------------

criterion_group!(benches, insert_operations, lookup_operations, queue_operations);
criterion_main!(benches);
