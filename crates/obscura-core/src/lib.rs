//! # Obscura Core
//!
//! The batch-oblivious request engine behind Obscura: a bounded LRU
//! front cache, a dual min-heap decoy scheduler, a deterministic
//! backend-index deriver, and the six-phase batch planner that blends
//! real reads with dummy and real-decoy padding before handing a
//! fixed-size batch to the fanout executor.
//!
//! This crate treats the HTTP surface, the backend key-value store
//! itself, and the request-framing collaborator as external — see
//! [`backend::Backend`] for the seam, `obscura-server` for the REST
//! surface, and `obscura-cli` for the command-line driver.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use obscura_core::{Engine, ObscuraConfig};
//! use obscura_core::backend::InMemoryBackend;
//! use obscura_core::request::{ClientRequest, Op};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let config = ObscuraConfig::default();
//! let engine = Engine::new(&config, Arc::new(InMemoryBackend::new()));
//!
//! let responses = engine
//!     .run_batch(vec![ClientRequest {
//!         rid: "r1".to_string(),
//!         op: Op::Read,
//!         key: "alpha".to_string(),
//!         val: None,
//!     }])
//!     .await;
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod backend_index;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod planner;
pub mod request;
pub mod scheduler;

pub use config::ObscuraConfig;
pub use engine::{Engine, EngineStats, EngineStatsSnapshot};
pub use error::{Error, Result};
