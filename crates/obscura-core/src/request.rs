//! Request-framing types consumed by the batch planner.
//!
//! Request framing itself — HTTP, a queue, whatever delivers a batch of
//! these — is an external collaborator out of scope for this crate; it
//! only needs to hand the planner a `Vec<ClientRequest>` and read back
//! the returned map.

use serde::{Deserialize, Serialize};

/// The opaque payload type the proxy treats as a blob.
///
/// Modeled as `serde_json::Value` rather than raw bytes because the
/// request-framing collaborator speaks JSON: `val` is `any?` on the
/// wire, and the planner only ever moves it around and stringifies it
/// for backend write-back, never interprets it.
pub type Value = serde_json::Value;

/// The requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Fetch the current value of a key.
    Read,
    /// Store a new value for a key.
    Write,
}

/// One client request within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRequest {
    /// Client-chosen request identifier; a single rid may recur if the
    /// same logical call issues multiple reads.
    pub rid: String,
    /// The requested operation.
    pub op: Op,
    /// The logical key. An empty key causes silent drop.
    pub key: String,
    /// The value to write, for `op: write`. Ignored for reads.
    #[serde(default)]
    pub val: Option<Value>,
}

/// The response for one request-id: a single value, or an ordered list
/// when multiple reads under the same rid resolved to values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// A single resolved value.
    Single(Value),
    /// Multiple resolved values, in arrival order.
    Multiple(Vec<Value>),
}
