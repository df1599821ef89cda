//! In-process metrics collaborators.
//!
//! The core emits through the statsd-shaped `Stats` trait; this module
//! provides an in-memory sink for tests and local debugging. Wire
//! transports to real backends stay outside this repository.

pub mod memory;

pub use memory::{HistogramSummary, MemoryStats};
