//! Performance Benchmarks for the State Trie
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera::prelude::*;

fn bench_pedersen(c: &mut Criterion) {
    let a = Felt::from(0x1234_5678_9abc_def0u64);
    let b = Felt::from(0x0fed_cba9_8765_4321u64);

    c.bench_function("pedersen_hash", |bencher| {
        bencher.iter(|| pedersen_hash(&a, &b))
    });
}

fn bench_trie_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_insert");

    for size in [16usize, 64, 256] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, size| {
            bencher.iter(|| {
                let store = MemStore::new();
                let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
                for i in 0..*size {
                    trie.put(&Felt::from(i as u64 + 1), &Felt::from(0xbeefu64))
                        .unwrap();
                }
                trie.root_hash()
            })
        });
    }

    group.finish();
}

fn bench_trie_get(c: &mut Criterion) {
    let store = MemStore::new();
    let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
    for i in 0..256u64 {
        trie.put(&Felt::from(i + 1), &Felt::from(0xbeefu64)).unwrap();
    }

    c.bench_function("trie_get", |bencher| {
        bencher.iter(|| trie.get(&Felt::from(100u64)).unwrap())
    });
}

criterion_group!(benches, bench_pedersen, bench_trie_insert, bench_trie_get);
criterion_main!(benches);
