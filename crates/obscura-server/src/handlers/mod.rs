//! HTTP handlers for the Obscura REST surface.
//!
//! Organized by endpoint, same one-module-per-concern layout the
//! parent project's server handlers use.

pub mod batch;
pub mod health;
pub mod stats;

pub use batch::batch;
pub use health::health_check;
pub use stats::stats;
