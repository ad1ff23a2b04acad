//! The backend KV store collaborator.
//!
//! The backend is an opaque get/put interface with timeouts, not
//! something this crate implements end to end. `Backend` is the trait
//! the fanout executor programs against;
//! [`InMemoryBackend`] is one concrete, in-process implementation used
//! by tests, `obscura-cli bench`, and as the default when no external
//! store is wired up.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;

/// Errors a backend implementation may report.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The underlying store reported a failure.
    #[error("backend store error: {0}")]
    Store(String),
}

/// An opaque key-value backend addressed by backend index.
///
/// Implementations are expected to apply their own deadline handling
/// internally if they need to (e.g. a network client's request
/// timeout); the fanout executor additionally races every call against
/// a shared deadline regardless of what an implementation does on its
/// own.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the value stored at `index`, if any.
    async fn get(&self, index: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Stores `value` at `index`.
    async fn put(&self, index: &str, value: Vec<u8>) -> Result<(), BackendError>;
}

/// An in-process backend store guarded by a single async mutex.
///
/// Useful as a default for local testing and the `obscura-cli bench`
/// driver. Not durable — it holds everything in memory for the
/// lifetime of the process; persistence across restarts is an
/// explicit non-goal of this proxy.
pub struct InMemoryBackend {
    store: Mutex<HashMap<String, Vec<u8>>>,
    artificial_latency: Duration,
}

impl InMemoryBackend {
    /// Creates an empty in-memory backend with no artificial latency.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            artificial_latency: Duration::ZERO,
        }
    }

    /// Creates an in-memory backend that sleeps `latency` before every
    /// operation, to exercise the fanout executor's deadline handling
    /// in tests.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            artificial_latency: latency,
        }
    }

    /// Returns the number of entries currently stored, for test
    /// assertions and the CLI's summary table.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Backend for InMemoryBackend {
    async fn get(&self, index: &str) -> Result<Option<Vec<u8>>, BackendError> {
        if !self.artificial_latency.is_zero() {
            sleep(self.artificial_latency).await;
        }
        Ok(self.store.lock().await.get(index).cloned())
    }

    async fn put(&self, index: &str, value: Vec<u8>) -> Result<(), BackendError> {
        if !self.artificial_latency.is_zero() {
            sleep(self.artificial_latency).await;
        }
        self.store.lock().await.insert(index.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_on_empty_backend_is_none() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.get("idx").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let backend = InMemoryBackend::new();
        backend.put("idx", b"hello".to_vec()).await.unwrap();
        assert_eq!(backend.get("idx").await.unwrap(), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn put_overwrites_existing_value() {
        let backend = InMemoryBackend::new();
        backend.put("idx", b"first".to_vec()).await.unwrap();
        backend.put("idx", b"second".to_vec()).await.unwrap();
        assert_eq!(backend.get("idx").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn len_reflects_distinct_indices() {
        let backend = InMemoryBackend::new();
        backend.put("a", vec![]).await.unwrap();
        backend.put("b", vec![]).await.unwrap();
        assert_eq!(backend.len().await, 2);
    }
}
