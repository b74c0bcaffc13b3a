//! Throughput Benchmark for arbstore
//!
//! This benchmark measures the performance of the codec and the store
//! under various workloads.

use arbstore::codec::{self, unix_timestamp, PayloadRecord};
use arbstore::storage::ExpiringStore;
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

fn record(reference: &str, expires_at: i64) -> PayloadRecord {
    PayloadRecord::new(reference, "x".repeat(32), vec![7u8; 16], expires_at)
}

/// Benchmark payload encoding and decoding
fn bench_codec(c: &mut Criterion) {
    let sample = record("9f2c0a7be1d44f06a1b2c3d4e5f60718", unix_timestamp() + 1800);
    let encoded = codec::encode(&sample).unwrap();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode", |b| {
        b.iter(|| black_box(codec::encode(black_box(&sample)).unwrap()));
    });

    group.bench_function("decode", |b| {
        b.iter(|| black_box(codec::decode(black_box(&encoded)).unwrap()));
    });

    group.finish();
}

/// Benchmark CreateOrReplace operations
fn bench_create_or_replace(c: &mut Criterion) {
    let store = Arc::new(ExpiringStore::new());
    let expires_at = unix_timestamp() + 3600;

    let mut group = c.benchmark_group("create_or_replace");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new_keys", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i);
            store.create_or_replace(&key, &record(&key, expires_at)).unwrap();
            i += 1;
        });
    });

    group.bench_function("replace_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("hot:{}", i % 100);
            store.create_or_replace(&key, &record(&key, expires_at)).unwrap();
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET and Decode operations
fn bench_get(c: &mut Criterion) {
    let store = Arc::new(ExpiringStore::new());
    let expires_at = unix_timestamp() + 3600;

    // Pre-populate with data
    for i in 0..100_000 {
        let key = format!("key:{}", i);
        store.create_or_replace(&key, &record(&key, expires_at)).unwrap();
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing:{}", i);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.bench_function("decode_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(store.decode(&key).unwrap());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark concurrent access
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("4_threads_mixed", |b| {
        b.iter(|| {
            let store = Arc::new(ExpiringStore::new());
            let expires_at = unix_timestamp() + 3600;
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || {
                        for i in 0..10_000 {
                            let key = format!("key:{}:{}", t, i);
                            store.create_or_replace(&key, &record(&key, expires_at)).unwrap();
                            store.get(&key);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            black_box(store.len());
        });
    });

    group.finish();
}

/// Benchmark sweep passes
fn bench_sweep(c: &mut Criterion) {
    let now = unix_timestamp();

    let mut group = c.benchmark_group("sweep");

    // Nothing to remove: measures the snapshot and decode cost
    group.bench_function("sweep_10k_live", |b| {
        let store = ExpiringStore::new();
        for i in 0..10_000 {
            let key = format!("live:{}", i);
            store.create_or_replace(&key, &record(&key, now + 3600)).unwrap();
        }
        b.iter(|| black_box(store.cleanup_expired_at(now)));
    });

    group.bench_function("sweep_10k_half_expired", |b| {
        b.iter_batched(
            || {
                let store = ExpiringStore::new();
                for i in 0..10_000 {
                    let key = format!("key:{}", i);
                    let expires_at = if i % 2 == 0 { now - 1 } else { now + 3600 };
                    store.create_or_replace(&key, &record(&key, expires_at)).unwrap();
                }
                store.add("corrupt", Bytes::from_static(b"garbage")).unwrap();
                store
            },
            |store| black_box(store.cleanup_expired_at(now)),
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_codec,
    bench_create_or_replace,
    bench_get,
    bench_concurrent,
    bench_sweep,
);

criterion_main!(benches);
