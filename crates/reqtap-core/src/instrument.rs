//! Request lifecycle instrumentation: the start/finish orchestration.
//!
//! One `Instrumentor` is built at service start and shared across all
//! requests. `start` decorates the request with tracking state and logs
//! the arrival; `finish` classifies the completion, logs it at the level
//! its status class calls for, flags slow responses, and emits the
//! metric set when a Stats collaborator is configured.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};

use crate::collab::{HeaderSink, LogFields, Logger, RequestMeta, Stats};
use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::outcome::CompletionOutcome;
use crate::{path, request_id};

/// Responses slower than this emit an extra warning log and a
/// `slow_response` counter tick. Purely observational; nothing is aborted.
pub const SLOW_RESPONSE_MS: u64 = 1000;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// How the host response looked when the request finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    /// Live response status observed by the adapter.
    Status(u16),
    /// No status was ever established; classifies as 200 absent an error.
    NoStatus,
    /// The response object never started (headers never sent).
    Unsent,
}

/// Orchestrates the instrumentation lifecycle around one request.
///
/// Holds no per-request state; `Logger` and `Stats` are the only shared
/// resources and must be concurrency-safe by construction. Every
/// collaborator call is shielded: a panicking backend is reported and
/// swallowed, never allowed to affect the response path.
pub struct Instrumentor {
    logger: Arc<dyn Logger>,
    stats: Option<Arc<dyn Stats>>,
}

impl Instrumentor {
    pub fn new(logger: Arc<dyn Logger>, stats: Option<Arc<dyn Stats>>) -> Self {
        Self { logger, stats }
    }

    /// Start phase: decorate the request and log its arrival.
    ///
    /// Assigns the request id, captures the start instant, normalizes the
    /// path, and (best-effort) injects the `X-Request-ID` response header
    /// when the host hands us a sink. The returned context must reach the
    /// finish phase for the same request.
    pub fn start(
        &self,
        req: &dyn RequestMeta,
        headers: Option<&mut dyn HeaderSink>,
    ) -> RequestContext {
        let ctx = RequestContext {
            request_id: request_id::generate(),
            started_at: Instant::now(),
            normalized_path: path::normalized_path(req.raw_path()),
            error: None,
        };

        let mut fields = LogFields::new();
        fields.insert("method".into(), Value::from(req.method()));
        if let Some(p) = req.raw_path() {
            fields.insert("path".into(), Value::from(p));
        }
        fields.insert("id".into(), Value::from(ctx.request_id.as_str()));
        fields.insert("query".into(), Value::Object(req.query_params()));
        let message = format!("request {}", ctx.request_id);
        shielded("logger", || self.logger.info(&message, &fields));

        if let Some(sink) = headers {
            sink.set_header(REQUEST_ID_HEADER, &ctx.request_id);
        }

        ctx
    }

    /// Finish phase: classify, log, and emit metrics. Terminal and
    /// infallible; called exactly once per request by the adapters.
    pub fn finish(
        &self,
        req: &dyn RequestMeta,
        mut ctx: RequestContext,
        disposition: ResponseDisposition,
        error: Option<HandlerError>,
    ) {
        let elapsed = ctx.started_at.elapsed();
        let outcome = match (disposition, &error) {
            (ResponseDisposition::Unsent, None) => CompletionOutcome::unsent(elapsed),
            (ResponseDisposition::Status(code), _) => {
                CompletionOutcome::classify(Some(code), error.as_ref(), elapsed)
            }
            (_, _) => CompletionOutcome::classify(None, error.as_ref(), elapsed),
        };
        ctx.error = error;

        if let Some(stats) = &self.stats {
            self.emit_stats(stats, req, &ctx, &outcome);
        }

        if outcome.duration_millis() > SLOW_RESPONSE_MS {
            let mut fields = LogFields::new();
            if let Some(p) = req.raw_path() {
                fields.insert("url".into(), Value::from(p));
            }
            fields.insert("id".into(), Value::from(ctx.request_id.as_str()));
            fields.insert("method".into(), Value::from(req.method()));
            fields.insert("duration".into(), Value::from(outcome.duration_millis()));
            if let Some(route) = &ctx.normalized_path {
                fields.insert("route".into(), Value::from(route.as_str()));
            }
            shielded("logger", || self.logger.warning("slow response", &fields));
        }

        let mut fields = LogFields::new();
        fields.insert("method".into(), Value::from(req.method()));
        if let Some(p) = req.raw_path() {
            fields.insert("path".into(), Value::from(p));
        }
        fields.insert("id".into(), Value::from(ctx.request_id.as_str()));
        fields.insert("status".into(), Value::from(outcome.status_code()));
        fields.insert("query".into(), Value::Object(req.query_params()));
        let message = format!("response {}", ctx.request_id);

        if outcome.status_class() == 4 {
            shielded("logger", || self.logger.warning(&message, &fields));
        } else if outcome.status_class() == 5 || ctx.error.is_some() {
            if let Some(err) = &ctx.error {
                fields.insert(
                    "error".into(),
                    json!({ "message": err.to_string(), "statusCode": err.status_code() }),
                );
            }
            shielded("logger", || self.logger.error(&message, &fields));
        } else {
            shielded("logger", || self.logger.info(&message, &fields));
        }
    }

    fn emit_stats(
        &self,
        stats: &Arc<dyn Stats>,
        req: &dyn RequestMeta,
        ctx: &RequestContext,
        outcome: &CompletionOutcome,
    ) {
        let mut tags = vec![
            format!("method:{}", req.method()),
            format!("status:{}", outcome.status_code()),
            format!("statusGroup:{}", outcome.status_group()),
        ];

        shielded("stats", || {
            if let Some(route) = &ctx.normalized_path {
                tags.push(format!("route:{route}"));
                let name = format!("route_{}_{}", req.method(), route);
                stats.histogram(&name, outcome.duration_millis(), &tags);
            }

            stats.incr(&format!("response_status_{}", outcome.status_group()), 1, &tags);
            stats.incr("response_status", 1, &tags);
            stats.histogram("response_duration", outcome.duration_millis(), &tags);

            if outcome.duration_millis() > SLOW_RESPONSE_MS {
                stats.incr("slow_response", 1, &tags);
            }

            // A 4xx ticks both counters; a 5xx only response_error.
            if outcome.status_class() == 4 {
                stats.incr("client_error", 1, &tags);
                stats.incr("response_error", 1, &tags);
            } else if outcome.status_class() == 5 {
                stats.incr("response_error", 1, &tags);
            }
        });
    }
}

/// Run a collaborator call, reporting and swallowing any panic so
/// instrumentation failures never reach the response path.
fn shielded<F: FnOnce()>(collaborator: &'static str, f: F) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(collaborator, "collaborator panicked during instrumentation");
    }
}
