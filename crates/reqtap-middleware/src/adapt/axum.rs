//! Axum integration.
//!
//! A `from_fn`-style middleware that runs the instrumentation lifecycle
//! around `next.run`. The request id is exposed to downstream handlers
//! through a [`RequestId`] extension and echoed in the `X-Request-ID`
//! response header; the finish phase reads the status off the returned
//! response (Axum surfaces handler failures as 5xx responses, so this
//! path never carries an explicit error).

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use serde_json::Value;

use reqtap_core::{
    Instrumentor, LogFields, RequestMeta, ResponseDisposition, REQUEST_ID_HEADER,
};

/// Request id extension stored for downstream handlers.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Instrument one request. Apply with `axum::middleware::from_fn`,
/// closing over a shared `Instrumentor`:
///
/// ```ignore
/// let app = Router::new()
///     .route("/ping", get(handler))
///     .layer(middleware::from_fn(move |req, next| {
///         tap_middleware(instr.clone(), req, next)
///     }));
/// ```
pub async fn tap_middleware(
    instr: Arc<Instrumentor>,
    mut request: Request,
    next: Next,
) -> Response {
    let meta = AxumRequestMeta::of(&request);
    let ctx = instr.start(&meta, None);
    request
        .extensions_mut()
        .insert(RequestId(ctx.request_id.clone()));

    let mut response = next.run(request).await;

    if let (Ok(name), Ok(value)) = (
        HeaderName::try_from(REQUEST_ID_HEADER),
        HeaderValue::try_from(ctx.request_id.as_str()),
    ) {
        response.headers_mut().insert(name, value);
    }

    let status = response.status().as_u16();
    instr.finish(&meta, ctx, ResponseDisposition::Status(status), None);
    response
}

struct AxumRequestMeta {
    method: String,
    raw_path: String,
    query: LogFields,
}

impl AxumRequestMeta {
    fn of(request: &Request) -> Self {
        let uri = request.uri();
        let raw_path = match uri.path_and_query() {
            Some(pq) => pq.as_str().to_owned(),
            None => uri.path().to_owned(),
        };
        Self {
            method: request.method().to_string(),
            raw_path,
            query: uri.query().map(parse_query).unwrap_or_default(),
        }
    }
}

impl RequestMeta for AxumRequestMeta {
    fn method(&self) -> &str {
        &self.method
    }

    fn raw_path(&self) -> Option<&str> {
        Some(&self.raw_path)
    }

    fn query_params(&self) -> LogFields {
        self.query.clone()
    }
}

fn parse_query(query: &str) -> LogFields {
    let mut fields = LogFields::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        fields.insert(k.to_owned(), Value::from(v));
    }
    fields
}
