//! # VM SDK Core Benchmarks
//!
//! | Area | Operation | Expectation |
//! |------|-----------|-------------|
//! | Window | roll / project | constant time, < 1µs |
//! | Builder | rate predicate | < 1µs |
//! | Chain | verify + accept | no growth with cache size |
//! | Chain | cached lookup | < 1µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::FixedTimeSource;
use std::sync::Arc;
use vmsdk_builder::{RateLimiter, TipSnapshot};
use vmsdk_chain::{
    Block, BlockLifecycleApi, BlockStore, ChainConfig, ChainMetrics, InMemoryBlockDatabase,
};
use vmsdk_window::{Window, WINDOW_SIZE};

const NOW: i64 = 1_700_000_000;

fn random_window() -> Window {
    let mut rng = rand::thread_rng();
    let mut slots = [0u64; WINDOW_SIZE];
    for slot in slots.iter_mut() {
        *slot = rng.gen_range(0..8);
    }
    Window::from_slots(slots)
}

// ============================================================================
// Window
// ============================================================================

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let window = random_window();

    for elapsed in [0i64, 1, 30, 59, 120] {
        group.bench_with_input(BenchmarkId::new("project", elapsed), &elapsed, |b, &e| {
            b.iter(|| black_box(window.project(black_box(e))))
        });
    }

    group.bench_function("next_for_child", |b| {
        b.iter(|| black_box(window.next_for_child(NOW, black_box(NOW + 1))))
    });

    group.finish();
}

// ============================================================================
// Builder rate predicate
// ============================================================================

fn bench_rate_limiter(c: &mut Criterion) {
    let limiter = RateLimiter::new(2);
    let tip = TipSnapshot {
        height: 1_000,
        timestamp: NOW,
        window: random_window(),
    };

    c.bench_function("rate_limiter/should_build", |b| {
        b.iter(|| black_box(limiter.should_build(black_box(&tip), NOW + 1)))
    });
}

// ============================================================================
// Block store
// ============================================================================

fn chain_of(len: usize) -> (Block, Vec<Block>) {
    let genesis = Block::genesis(NOW).unwrap();
    let mut blocks = Vec::with_capacity(len);
    let mut parent = genesis.clone();
    for i in 0..len {
        let block = Block::child(&parent, NOW + (i as i64 / 2), 1, 1).unwrap();
        blocks.push(block.clone());
        parent = block;
    }
    (genesis, blocks)
}

fn bench_block_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_store");

    for cache in [16usize, 128, 1_024] {
        let (genesis, blocks) = chain_of(256);
        group.throughput(Throughput::Elements(blocks.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("verify_accept_256", cache),
            &cache,
            |b, &cache| {
                b.iter(|| {
                    let db = Arc::new(InMemoryBlockDatabase::new());
                    let config = ChainConfig {
                        accepted_cache_capacity: cache,
                        accepted_queue_capacity: 1_024,
                        ..ChainConfig::default()
                    };
                    let (store, _rx) = BlockStore::new(
                        &config,
                        db,
                        Arc::new(FixedTimeSource::new(NOW + 1_000)),
                        ChainMetrics::unregistered().unwrap(),
                    )
                    .unwrap();
                    store.prime_accepted(Arc::new(genesis.clone()));
                    for block in &blocks {
                        store.verify(block.clone()).unwrap();
                        store.accept(&block.id()).unwrap();
                    }
                    black_box(store.accepted_cache_len())
                })
            },
        );
    }

    let (genesis, blocks) = chain_of(128);
    let (store, _rx) = BlockStore::new(
        &ChainConfig::default(),
        Arc::new(InMemoryBlockDatabase::new()),
        Arc::new(FixedTimeSource::new(NOW + 1_000)),
        ChainMetrics::unregistered().unwrap(),
    )
    .unwrap();
    store.prime_accepted(Arc::new(genesis));
    for block in &blocks {
        store.verify(block.clone()).unwrap();
        store.accept(&block.id()).unwrap();
    }
    let target = blocks[blocks.len() / 2].id();
    group.bench_function("cached_lookup", |b| {
        b.iter(|| black_box(store.get_block(black_box(&target)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_window, bench_rate_limiter, bench_block_store);
criterion_main!(benches);
