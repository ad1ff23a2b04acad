//! The fanout executor.
//!
//! Issues one backend call per read-plan or write-plan entry
//! concurrently, all racing a single shared deadline. A per-index
//! failure or timeout is logged and that index is simply absent from
//! the result — the batch never aborts on partial failure.
//!
//! Built on `tokio::task::JoinSet` plus `tokio::time::timeout`: every
//! call is spawned onto the join set, and the whole collection races
//! one deadline together.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::Error;

/// Fans reads and writes out to a [`Backend`] under a shared deadline.
pub struct FanoutExecutor {
    backend: Arc<dyn Backend>,
    deadline: Duration,
    errors: AtomicU64,
}

impl FanoutExecutor {
    /// Creates an executor over `backend`, racing every call against
    /// `deadline`.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, deadline: Duration) -> Self {
        Self {
            backend,
            deadline,
            errors: AtomicU64::new(0),
        }
    }

    /// Returns the number of backend get/put failures logged since
    /// construction. Calls abandoned at the deadline without having
    /// errored are not counted here.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Records and logs a per-call failure with its stable error code.
    ///
    /// Per spec.md §7(b)/(c), a backend get or put failure is never
    /// fatal to the batch — every variant that reaches here is
    /// log-and-continue, never propagated; only a malformed request
    /// envelope or bad configuration would warrant surfacing an
    /// [`Error`] to a caller instead.
    fn record_failure(&self, index: Option<&str>, err: &Error) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        match index {
            Some(index) => warn!(%index, code = err.code(), %err, "backend call failed"),
            None => warn!(code = err.code(), %err, "backend call failed"),
        }
    }

    /// Issues one `get` per read-plan entry concurrently and returns
    /// whatever came back (by index) before the deadline expired.
    ///
    /// Entries that errored, returned no value, or were still in
    /// flight at the deadline are simply absent from the result.
    pub async fn fetch(&self, read_plan: &HashMap<String, String>) -> HashMap<String, Vec<u8>> {
        let mut tasks = JoinSet::new();
        for index in read_plan.keys().cloned() {
            let backend = Arc::clone(&self.backend);
            tasks.spawn(async move {
                let result = backend.get(&index).await;
                (index, result)
            });
        }

        let mut responses = HashMap::new();
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, Ok(Some(value)))) => {
                        responses.insert(index, value);
                    }
                    Ok((index, Ok(None))) => {
                        debug!(%index, "backend has no value for index");
                    }
                    Ok((index, Err(err))) => {
                        self.record_failure(Some(&index), &Error::from(err));
                    }
                    Err(join_err) => {
                        self.record_failure(None, &Error::Internal(join_err.to_string()));
                    }
                }
            }
        };

        if timeout(self.deadline, collect).await.is_err() {
            let err = Error::BackendTimeout(self.deadline);
            warn!(code = err.code(), %err, "abandoning outstanding gets");
            tasks.abort_all();
        }

        responses
    }

    /// Issues one `put` per write-plan entry concurrently. Failures
    /// and timeouts are logged, never surfaced to the caller —
    /// write-back is best-effort.
    pub async fn write(&self, write_plan: HashMap<String, Vec<u8>>) {
        let count = write_plan.len();
        debug!(count, "writing back batch");

        let mut tasks = JoinSet::new();
        for (index, value) in write_plan {
            let backend = Arc::clone(&self.backend);
            tasks.spawn(async move {
                let result = backend.put(&index, value).await;
                (index, result)
            });
        }

        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((_, Ok(()))) => {}
                    Ok((index, Err(err))) => {
                        self.record_failure(Some(&index), &Error::from(err));
                    }
                    Err(join_err) => {
                        self.record_failure(None, &Error::Internal(join_err.to_string()));
                    }
                }
            }
        };

        if timeout(self.deadline, collect).await.is_err() {
            let err = Error::BackendTimeout(self.deadline);
            warn!(code = err.code(), %err, "abandoning outstanding puts");
            tasks.abort_all();
        }
    }
}
