//! Collaborator and host abstractions consumed by the instrumentation core.
//!
//! These traits are the seams to the outside world: the logging and
//! metrics backends the core emits into, and the minimal view of the host
//! request/response it reads from. The core implements none of them.

use serde_json::{Map, Value};

/// Open field map attached to log records.
pub type LogFields = Map<String, Value>;

/// Structured logging collaborator.
///
/// Implementations must be safe for concurrent use; the core never
/// consumes return values and treats calls as fire-and-forget.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str, fields: &LogFields);
    fn warning(&self, message: &str, fields: &LogFields);
    fn error(&self, message: &str, fields: &LogFields);
}

/// Metrics collaborator, statsd-shaped.
///
/// Tags are `key:value` strings. The collaborator as a whole is optional;
/// when absent, the core skips metric emission entirely.
pub trait Stats: Send + Sync {
    fn incr(&self, name: &str, amount: i64, tags: &[String]);
    fn histogram(&self, name: &str, value: u64, tags: &[String]);
}

/// Read view of an inbound request: exactly what instrumentation needs.
pub trait RequestMeta {
    /// Request method, e.g. `GET`.
    fn method(&self) -> &str;
    /// Raw URL path, query string included when present.
    fn raw_path(&self) -> Option<&str>;
    /// Parsed query parameters, for log correlation. Empty when none.
    fn query_params(&self) -> LogFields;
}

/// Best-effort response header injection.
///
/// Hosts that cannot inject headers simply never hand one to `start`.
pub trait HeaderSink {
    fn set_header(&mut self, name: &str, value: &str);
}

/// Owned snapshot of request metadata.
///
/// Finish callbacks outlive the borrow of the original request, so
/// adapters snapshot what the finish phase will need.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    method: String,
    raw_path: Option<String>,
    query: LogFields,
}

impl RequestSnapshot {
    pub fn of(req: &dyn RequestMeta) -> Self {
        Self {
            method: req.method().to_owned(),
            raw_path: req.raw_path().map(str::to_owned),
            query: req.query_params(),
        }
    }
}

impl RequestMeta for RequestSnapshot {
    fn method(&self) -> &str {
        &self.method
    }

    fn raw_path(&self) -> Option<&str> {
        self.raw_path.as_deref()
    }

    fn query_params(&self) -> LogFields {
        self.query.clone()
    }
}
