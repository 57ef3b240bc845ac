use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use extendible_hash::{ExtendibleHashTable, Hashed, Identity, TableConfig};
use rand::prelude::*;
use std::collections::HashMap;

fn shuffled_keys(size: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut keys: Vec<u64> = (0..size).collect();
    keys.shuffle(&mut rng);
    keys
}

/// Keys agreeing on their low `shift` bits split one bucket repeatedly
fn bench_insert_shared_low_bits(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_shared_low_bits");
    let size = 1024u64;

    for shift in [0u32, 4, 8] {
        let keys: Vec<u64> = (0..size).map(|i| i << shift).collect();

        group.bench_with_input(BenchmarkId::new("shift", shift), &keys, |b, keys| {
            b.iter(|| {
                let mut table = ExtendibleHashTable::new();
                for &key in keys {
                    table.insert(key, key).unwrap();
                }
                black_box(table.global_depth())
            });
        });
    }

    group.finish();
}

/// Doubling from depth 0 against a directory allocated up front
fn bench_presized_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("presized_directory");
    let keys = shuffled_keys(50_000);

    for depth in [0u8, 8, 12, 15] {
        let config = TableConfig::new().initial_global_depth(depth);

        group.bench_with_input(BenchmarkId::new("initial_depth", depth), &config, |b, config| {
            b.iter(|| {
                let mut table = ExtendibleHashTable::with_config(*config, Identity).unwrap();
                for &key in &keys {
                    table.insert(key, key).unwrap();
                }
                black_box(table)
            });
        });
    }

    group.finish();
}

/// Lookups through a directory much deeper than most buckets
fn bench_lookup_aliased(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_aliased");

    for size in [10_000u64, 100_000] {
        let keys = shuffled_keys(size);

        let mut shallow = ExtendibleHashTable::new();
        for &key in &keys {
            shallow.insert(key, key).unwrap();
        }

        // with key 0 these share 18 low bits, forcing one bucket to depth 19
        let mut aliased = ExtendibleHashTable::new();
        for key in (1..4).map(|i| (i << 18) + (size << 18)) {
            aliased.insert(key, key).unwrap();
        }
        for &key in &keys {
            aliased.insert(key, key).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("shallow", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(shallow.get(key));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("aliased", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(aliased.get(key));
                }
            });
        });
    }

    group.finish();
}

/// Removal never merges, so refilling reuses the split buckets
fn bench_remove_then_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_then_reinsert");

    for size in [1000u64, 10_000] {
        group.bench_with_input(BenchmarkId::new("refill", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut table = ExtendibleHashTable::new();
                    for i in 0..size {
                        table.insert(i, i).unwrap();
                    }
                    for i in 0..size {
                        table.remove(&i).unwrap();
                    }
                    table
                },
                |mut table| {
                    for i in 0..size {
                        table.insert(i, i).unwrap();
                    }
                    table
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("fresh", size), &size, |b, &size| {
            b.iter(|| {
                let mut table = ExtendibleHashTable::new();
                for i in 0..size {
                    table.insert(i, i).unwrap();
                }
                black_box(table)
            });
        });
    }

    group.finish();
}

fn bench_bucket_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_capacity");
    let size = 10_000u64;

    for capacity in [1usize, 3, 8, 32] {
        let config = TableConfig::new().bucket_capacity(capacity);

        group.bench_with_input(BenchmarkId::new("insert", capacity), &config, |b, config| {
            b.iter(|| {
                let mut table = ExtendibleHashTable::with_config(*config, Identity).unwrap();
                for i in 0..size {
                    table.insert(i, i).unwrap();
                }
                black_box(table)
            });
        });
    }

    group.finish();
}

fn bench_string_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_keys");

    for size in [1000, 10_000] {
        let keys: Vec<String> = (0..size).map(|i| format!("key-{}", i)).collect();

        group.bench_with_input(BenchmarkId::new("ExtendibleHashTable", size), &keys, |b, keys| {
            b.iter(|| {
                let mut table = ExtendibleHashTable::with_hasher(Hashed::random());
                for key in keys {
                    table.insert(key.clone(), key.len()).unwrap();
                }
                black_box(table)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = HashMap::new();
                for key in keys {
                    map.insert(key.clone(), key.len());
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_shared_low_bits,
    bench_presized_directory,
    bench_lookup_aliased,
    bench_remove_then_reinsert,
    bench_bucket_capacity,
    bench_string_keys,
);

criterion_main!(benches);
