//! Batch-planner throughput benchmark.
//!
//! Measures end-to-end `run_batch` latency against an in-memory backend
//! across a range of batch sizes and decoy counts, to catch regressions
//! in the dual-heap scheduler or the fanout executor's task overhead.
//!
//! # Run with
//!
//! ```bash
//! cargo bench --bench batch_throughput_benchmark
//! ```

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use obscura_core::backend::InMemoryBackend;
use obscura_core::config::ObscuraConfig;
use obscura_core::engine::Engine;
use obscura_core::request::{ClientRequest, Op};
use tokio::runtime::Runtime;

fn config_for(batch_size: usize, fake_dummy_count: usize) -> ObscuraConfig {
    let mut config = ObscuraConfig::default();
    config.batch.batch_size = batch_size;
    config.batch.fake_dummy_count = fake_dummy_count;
    config.batch.total_dummies = fake_dummy_count.max(1) * 20;
    config.cache.capacity = batch_size * 2;
    config
}

fn requests_for(count: usize) -> Vec<ClientRequest> {
    (0..count)
        .map(|i| ClientRequest {
            rid: format!("rid-{i}"),
            op: Op::Read,
            key: format!("key-{}", i % 50),
            val: None,
        })
        .collect()
}

fn bench_run_batch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("run_batch");

    for &batch_size in &[16usize, 64, 256] {
        let config = config_for(batch_size, batch_size / 4);
        let engine = Engine::new(&config, Arc::new(InMemoryBackend::new()));
        let requests = requests_for(batch_size);

        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch_size, |b, _| {
            b.to_async(&rt).iter(|| async {
                let result = engine.run_batch(black_box(requests.clone())).await;
                black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_run_batch_with_latency(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let config = config_for(64, 16);
    let engine = Engine::new(&config, Arc::new(InMemoryBackend::with_latency(Duration::from_micros(50))));
    let requests = requests_for(64);

    c.bench_function("run_batch_with_artificial_backend_latency", |b| {
        b.to_async(&rt).iter(|| async {
            let result = engine.run_batch(black_box(requests.clone())).await;
            black_box(result);
        });
    });
}

criterion_group!(benches, bench_run_batch, bench_run_batch_with_latency);
criterion_main!(benches);
