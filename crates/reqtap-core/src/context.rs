//! Per-request tracking state.

use std::time::Instant;

use crate::error::HandlerError;

/// State attached to one in-flight request by the start phase.
///
/// `request_id` and `started_at` are assigned exactly once, before any
/// log or metric referencing them, and are never mutated afterward. The
/// context is carried by the adapter (closure capture) from start to
/// finish, consumed there, and dropped; nothing is retained across
/// requests.
#[derive(Debug)]
pub struct RequestContext {
    /// Globally unique id assigned at start.
    pub request_id: String,
    /// Monotonic instant captured at start.
    pub started_at: Instant,
    /// Metric-safe route label, when the request exposed a path.
    pub normalized_path: Option<String>,
    /// Set only on failure paths, by the finish phase.
    pub error: Option<HandlerError>,
}
