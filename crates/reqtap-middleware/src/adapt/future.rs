//! Future-style adapter.
//!
//! Wraps handlers returning a future that resolves to
//! `Result<T, HandlerError>`. The wrapped call runs the start phase
//! synchronously, awaits the handler, finishes with no error on success
//! and with the error on failure, and passes the original outcome
//! through unchanged either way.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use reqtap_core::{
    HandlerError, Instrumentor, RequestMeta, RequestSnapshot, ResponseDisposition,
};

use super::Wrap;

/// Async request handler seam.
#[async_trait]
pub trait Handler<Req>: Send + Sync {
    type Output: Send;

    async fn call(&self, req: Req) -> Result<Self::Output, HandlerError>;
}

#[async_trait]
impl<F, Fut, Req, T> Handler<Req> for F
where
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, HandlerError>> + Send,
    Req: Send + 'static,
    T: Send,
{
    type Output = T;

    async fn call(&self, req: Req) -> Result<T, HandlerError> {
        self(req).await
    }
}

/// Implemented by handler outputs able to report the response status they
/// produced. Outputs reporting none classify as a 200.
pub trait StatusHint {
    fn status_hint(&self) -> Option<u16>;
}

/// Future-style adapter sharing one injected `Instrumentor`.
#[derive(Clone)]
pub struct FutureTap {
    instr: Arc<Instrumentor>,
}

impl FutureTap {
    pub fn new(instr: Arc<Instrumentor>) -> Self {
        Self { instr }
    }

    /// Wrap a handler whose output reports its own response status.
    pub fn wrap_hinted<H>(&self, handler: H) -> HintedHandler<H> {
        HintedHandler {
            instr: Arc::clone(&self.instr),
            inner: handler,
        }
    }
}

impl<H> Wrap<H> for FutureTap {
    type Wrapped = WrappedHandler<H>;

    fn wrap(&self, handler: H) -> WrappedHandler<H> {
        WrappedHandler {
            instr: Arc::clone(&self.instr),
            inner: handler,
        }
    }
}

/// A future-style handler with instrumentation attached.
pub struct WrappedHandler<H> {
    instr: Arc<Instrumentor>,
    inner: H,
}

#[async_trait]
impl<Req, H> Handler<Req> for WrappedHandler<H>
where
    Req: RequestMeta + Send + 'static,
    H: Handler<Req>,
{
    type Output = H::Output;

    async fn call(&self, req: Req) -> Result<H::Output, HandlerError> {
        let snap = RequestSnapshot::of(&req);
        let ctx = self.instr.start(&req, None);
        match self.inner.call(req).await {
            Ok(value) => {
                self.instr
                    .finish(&snap, ctx, ResponseDisposition::NoStatus, None);
                Ok(value)
            }
            Err(error) => {
                self.instr
                    .finish(&snap, ctx, ResponseDisposition::NoStatus, Some(error.clone()));
                Err(error)
            }
        }
    }
}

/// Like [`WrappedHandler`], but classifies successes with the status the
/// output reports.
pub struct HintedHandler<H> {
    instr: Arc<Instrumentor>,
    inner: H,
}

#[async_trait]
impl<Req, H> Handler<Req> for HintedHandler<H>
where
    Req: RequestMeta + Send + 'static,
    H: Handler<Req>,
    H::Output: StatusHint,
{
    type Output = H::Output;

    async fn call(&self, req: Req) -> Result<H::Output, HandlerError> {
        let snap = RequestSnapshot::of(&req);
        let ctx = self.instr.start(&req, None);
        match self.inner.call(req).await {
            Ok(value) => {
                let disposition = value
                    .status_hint()
                    .map_or(ResponseDisposition::NoStatus, ResponseDisposition::Status);
                self.instr.finish(&snap, ctx, disposition, None);
                Ok(value)
            }
            Err(error) => {
                self.instr
                    .finish(&snap, ctx, ResponseDisposition::NoStatus, Some(error.clone()));
                Err(error)
            }
        }
    }
}
