//! The batch planner — the core algorithm.
//!
//! Runs six phases over one ordered batch of client requests: ingest
//! and dedup, seed the read plan with real needs, inject dummy decoys,
//! pad with real decoys, top up with dummies, then execute the read
//! plan and reconcile responses into a write plan.
//!
//! Expressed as explicit phase methods rather than one long function
//! body, with `HashMap`/`Vec` dedup records owned entirely by a single
//! batch run.

use std::collections::HashMap;

use tracing::debug;

use crate::backend_index::{derive, is_real};
use crate::cache::LruCache;
use crate::executor::FanoutExecutor;
use crate::request::{ClientRequest, Op, ResponseValue, Value};
use crate::scheduler::{KeyClass, Scheduler};

struct DedupRecord {
    rid: String,
    needs_response: bool,
}

/// Configuration the planner needs on every batch, pulled from
/// [`crate::config::BatchConfig`].
pub struct PlannerParams {
    /// Fixed outgoing read-plan size.
    pub batch_size: usize,
    /// Dummy decoys injected in Phase 3.
    pub fake_dummy_count: usize,
    /// Naming prefix that classifies a key as dummy.
    pub dummy_prefix: String,
}

/// Runs batches against a shared [`LruCache`], [`Scheduler`], and
/// [`FanoutExecutor`].
///
/// Holds no per-batch state of its own — every batch creates its own
/// dedup map, read plan, and write plan on entry and discards them on
/// exit.
pub struct Planner<'a> {
    cache: &'a LruCache<String, Value>,
    scheduler: &'a Scheduler,
    executor: &'a FanoutExecutor,
    params: &'a PlannerParams,
}

impl<'a> Planner<'a> {
    /// Creates a planner over the given collaborators.
    #[must_use]
    pub fn new(
        cache: &'a LruCache<String, Value>,
        scheduler: &'a Scheduler,
        executor: &'a FanoutExecutor,
        params: &'a PlannerParams,
    ) -> Self {
        Self {
            cache,
            scheduler,
            executor,
            params,
        }
    }

    /// Runs one batch at timestamp `timestamp`, returning the
    /// per-request-id response map.
    pub async fn run_batch(
        &self,
        requests: Vec<ClientRequest>,
        timestamp: i64,
    ) -> HashMap<String, ResponseValue> {
        let mut responses: HashMap<String, Vec<Value>> = HashMap::new();
        let mut dedup: HashMap<String, Vec<DedupRecord>> = HashMap::new();

        self.ingest(requests, &mut responses, &mut dedup);

        let mut read_plan: HashMap<String, String> = HashMap::new();
        self.seed_real_needs(&dedup, timestamp, &mut read_plan);
        self.inject_dummy_decoys(timestamp, &mut read_plan);
        self.pad_with_real_decoys(timestamp, &mut read_plan);
        self.top_up_with_dummies(timestamp, &mut read_plan);

        debug!(size = read_plan.len(), %timestamp, "submitting read plan");
        let fetched = self.executor.fetch(&read_plan).await;

        let write_plan = self.reconcile(&read_plan, &fetched, &dedup, timestamp, &mut responses);
        self.executor.write(write_plan).await;

        responses
            .into_iter()
            .map(|(rid, mut values)| {
                let value = if values.len() == 1 {
                    ResponseValue::Single(values.remove(0))
                } else {
                    ResponseValue::Multiple(values)
                };
                (rid, value)
            })
            .collect()
    }

    /// Phase 1 — Ingest.
    fn ingest(
        &self,
        requests: Vec<ClientRequest>,
        responses: &mut HashMap<String, Vec<Value>>,
        dedup: &mut HashMap<String, Vec<DedupRecord>>,
    ) {
        for request in requests {
            debug!(rid = %request.rid, op = ?request.op, key = %request.key, "processing request");

            if request.key.is_empty() {
                continue;
            }

            match request.op {
                Op::Read => {
                    if let Some(value) = self.cache.get(&request.key) {
                        responses.entry(request.rid).or_default().push(value);
                    } else {
                        dedup.entry(request.key.clone()).or_default().push(DedupRecord {
                            rid: request.rid,
                            needs_response: true,
                        });
                    }
                    self.scheduler.add(&request.key, KeyClass::Real);
                }
                Op::Write => {
                    if let Some(value) = request.val {
                        if !self.cache.has(&request.key) {
                            dedup.entry(request.key.clone()).or_default().push(DedupRecord {
                                rid: request.rid,
                                needs_response: false,
                            });
                        }
                        self.cache.put(request.key.clone(), value);
                        self.scheduler.add(&request.key, KeyClass::Real);
                    }
                }
            }
        }
    }

    /// Phase 2 — Seed the read plan with real needs.
    fn seed_real_needs(
        &self,
        dedup: &HashMap<String, Vec<DedupRecord>>,
        timestamp: i64,
        read_plan: &mut HashMap<String, String>,
    ) {
        for key in dedup.keys() {
            read_plan.insert(derive(key, timestamp), key.clone());
            self.scheduler.set_timestamp(key, timestamp, KeyClass::Real);
        }
    }

    /// Phase 3 — Inject dummy decoys.
    fn inject_dummy_decoys(&self, timestamp: i64, read_plan: &mut HashMap<String, String>) {
        for _ in 0..self.params.fake_dummy_count {
            self.add_dummy_decoy(timestamp, read_plan);
        }
    }

    /// Phase 4 — Pad with real decoys.
    fn pad_with_real_decoys(&self, timestamp: i64, read_plan: &mut HashMap<String, String>) {
        while read_plan.len() < self.params.batch_size {
            let Some(key) = self.scheduler.pop_min(KeyClass::Real) else {
                break;
            };
            self.scheduler.set_timestamp(&key, timestamp, KeyClass::Real);
            if !self.cache.has(&key) {
                read_plan.insert(derive(&key, timestamp), key);
            }
        }
    }

    /// Phase 5 — Top up with dummies.
    fn top_up_with_dummies(&self, timestamp: i64, read_plan: &mut HashMap<String, String>) {
        while read_plan.len() < self.params.batch_size {
            if self.add_dummy_decoy(timestamp, read_plan).is_none() {
                break;
            }
        }
    }

    /// Pops one dummy key and adds it to the read plan, if any remain.
    fn add_dummy_decoy(&self, timestamp: i64, read_plan: &mut HashMap<String, String>) -> Option<()> {
        let dummy = self.scheduler.pop_min(KeyClass::Dummy)?;
        read_plan.insert(derive(&dummy, timestamp), dummy.clone());
        self.scheduler.set_timestamp(&dummy, timestamp, KeyClass::Dummy);
        Some(())
    }

    /// Phase 6 — Execute and reconcile.
    ///
    /// `read_plan` is keyed by backend index; for a dummy response the
    /// write-back reuses that same index. An evicted real key is a
    /// different key, so its write-back index is re-derived from the
    /// evicted key at the same batch timestamp.
    fn reconcile(
        &self,
        read_plan: &HashMap<String, String>,
        fetched: &HashMap<String, Vec<u8>>,
        dedup: &HashMap<String, Vec<DedupRecord>>,
        timestamp: i64,
        responses: &mut HashMap<String, Vec<Value>>,
    ) -> HashMap<String, Vec<u8>> {
        let mut write_plan = HashMap::new();

        for (index, raw_value) in fetched {
            let Some(key) = read_plan.get(index) else {
                continue;
            };
            let Some(records) = dedup.get(key) else {
                continue;
            };

            let value = decode(raw_value);

            for record in records {
                if record.needs_response {
                    responses
                        .entry(record.rid.clone())
                        .or_default()
                        .push(value.clone());
                }
            }

            if is_real(key, &self.params.dummy_prefix) {
                if let Some((evicted_key, evicted_value)) = self.cache.evict() {
                    let evicted_index = derive(&evicted_key, timestamp);
                    write_plan.insert(evicted_index, stringify(&evicted_value));
                }
                self.cache.put(key.clone(), value);
            } else {
                write_plan.insert(index.clone(), Vec::new());
            }
        }

        write_plan
    }
}

/// Decodes a raw backend payload back into a [`Value`].
///
/// Values this engine itself wrote are JSON-encoded (see
/// [`stringify`]); anything that fails to parse as JSON is treated as
/// an opaque string, since the backend treats payloads as blobs rather
/// than a committed schema.
fn decode(raw: &[u8]) -> Value {
    serde_json::from_slice(raw).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()))
}

/// Stringifies a cached value for write-back.
fn stringify(value: &Value) -> Vec<u8> {
    match value {
        Value::String(s) => s.as_bytes().to_vec(),
        other => other.to_string().into_bytes(),
    }
}
