//! The engine — shared mutable state threaded through every batch,
//! constructed once at startup and passed into the planner explicitly
//! rather than held as ambient global state.
//!
//! Bundles the cache, scheduler, configuration, and backend behind one
//! constructor that also seeds the dummy keyspace into the scheduler's
//! dummy heap.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::backend::Backend;
use crate::cache::LruCache;
use crate::config::ObscuraConfig;
use crate::executor::FanoutExecutor;
use crate::planner::{Planner, PlannerParams};
use crate::request::{ClientRequest, ResponseValue, Value};
use crate::scheduler::{KeyClass, Scheduler};

/// Engine-wide counters, accumulated with atomics the same way the
/// cache's own hit/miss/eviction counters are.
#[derive(Debug, Default)]
pub struct EngineStats {
    batches_run: AtomicU64,
    dummy_reads_issued: AtomicU64,
}

/// A point-in-time snapshot of [`EngineStats`].
#[derive(Debug, Clone, Default)]
pub struct EngineStatsSnapshot {
    /// Total batches run since startup.
    pub batches_run: u64,
    /// Total dummy-decoy reads issued (Phase 3 + Phase 5) since startup.
    pub dummy_reads_issued: u64,
    /// Total backend get/put failures logged since startup.
    pub backend_errors: u64,
}

impl EngineStats {
    fn record_batch(&self, dummy_reads: u64) {
        self.batches_run.fetch_add(1, Ordering::Relaxed);
        self.dummy_reads_issued.fetch_add(dummy_reads, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current counters, pulling
    /// `backend_errors` from the executor since that's where the
    /// fanout's own failure count actually lives.
    #[must_use]
    fn snapshot(&self, backend_errors: u64) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            batches_run: self.batches_run.load(Ordering::Relaxed),
            dummy_reads_issued: self.dummy_reads_issued.load(Ordering::Relaxed),
            backend_errors,
        }
    }
}

/// The process-global engine: cache, scheduler, and backend fanout
/// bundled behind one value, constructed once at startup and shared
/// across every batch.
pub struct Engine {
    cache: LruCache<String, Value>,
    scheduler: Scheduler,
    executor: FanoutExecutor,
    params: PlannerParams,
    stats: EngineStats,
}

impl Engine {
    /// Builds an engine from `config` and `backend`, seeding the dummy
    /// keyspace `dummy_0 .. dummy_{total_dummies - 1}` into the
    /// scheduler's dummy heap.
    #[must_use]
    pub fn new(config: &ObscuraConfig, backend: Arc<dyn Backend>) -> Self {
        let scheduler = Scheduler::new();
        for i in 0..config.batch.total_dummies {
            scheduler.add(&format!("{}{i}", config.batch.dummy_prefix), KeyClass::Dummy);
        }
        debug!(count = config.batch.total_dummies, "seeded dummy keyspace");

        let executor = FanoutExecutor::new(backend, Duration::from_millis(config.backend.deadline_ms));

        Self {
            cache: LruCache::new(config.cache.capacity),
            scheduler,
            executor,
            params: PlannerParams {
                batch_size: config.batch.batch_size,
                fake_dummy_count: config.batch.fake_dummy_count,
                dummy_prefix: config.batch.dummy_prefix.clone(),
            },
            stats: EngineStats::default(),
        }
    }

    /// Runs one batch of client requests at the current wall-clock
    /// timestamp.
    pub async fn run_batch(&self, requests: Vec<ClientRequest>) -> HashMap<String, ResponseValue> {
        #[allow(clippy::cast_possible_wrap)]
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        self.run_batch_at(requests, timestamp).await
    }

    /// Runs one batch at an explicit timestamp; exposed for
    /// deterministic testing and the `obscura-cli bench` driver.
    pub async fn run_batch_at(
        &self,
        requests: Vec<ClientRequest>,
        timestamp: i64,
    ) -> HashMap<String, ResponseValue> {
        let planner = Planner::new(&self.cache, &self.scheduler, &self.executor, &self.params);
        let response = planner.run_batch(requests, timestamp).await;

        #[allow(clippy::cast_possible_truncation)]
        let dummy_reads = (self.params.fake_dummy_count) as u64;
        self.stats.record_batch(dummy_reads);

        response
    }

    /// Returns a snapshot of the cache's hit/miss/eviction counters.
    #[must_use]
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    /// Returns a snapshot of the engine-wide batch counters.
    #[must_use]
    pub fn stats(&self) -> EngineStatsSnapshot {
        self.stats.snapshot(self.executor.error_count())
    }
}
