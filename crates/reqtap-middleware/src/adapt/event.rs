//! Event-style adapter.
//!
//! Bridges hosts whose response object is mutated in place and signals
//! completion through a one-time finished event. The wrapped call runs
//! the start phase synchronously, registers the finish listener, invokes
//! the handler, and returns without blocking on completion. Status is
//! read from the live response when the event fires; this path never
//! carries an explicit error.

use std::sync::Arc;

use reqtap_core::{
    HeaderSink, Instrumentor, RequestMeta, RequestSnapshot, ResponseDisposition,
};

use super::Wrap;

/// Read view of the live response at event-fire time.
pub trait ResponseView {
    /// Current status code.
    fn status_code(&self) -> u16;
    /// Whether the response has started (headers flushed).
    fn headers_sent(&self) -> bool;
}

/// One-time completion listener, invoked with the live response view.
pub type FinishListener = Box<dyn FnOnce(&dyn ResponseView) + Send>;

/// Mutable host response: header injection plus completion subscription.
pub trait EventResponse: ResponseView + HeaderSink {
    /// Register a one-time listener invoked when the response finishes.
    fn on_finished(&mut self, listener: FinishListener);
}

/// Event-style handler seam: operates on the live request/response pair.
pub trait EventHandler<Req, Res> {
    fn call(&self, req: &mut Req, res: &mut Res);
}

impl<F, Req, Res> EventHandler<Req, Res> for F
where
    F: Fn(&mut Req, &mut Res),
{
    fn call(&self, req: &mut Req, res: &mut Res) {
        self(req, res)
    }
}

/// Event-style adapter sharing one injected `Instrumentor`.
#[derive(Clone)]
pub struct EventTap {
    instr: Arc<Instrumentor>,
}

impl EventTap {
    pub fn new(instr: Arc<Instrumentor>) -> Self {
        Self { instr }
    }
}

impl<H> Wrap<H> for EventTap {
    type Wrapped = WrappedEvent<H>;

    fn wrap(&self, handler: H) -> WrappedEvent<H> {
        WrappedEvent {
            instr: Arc::clone(&self.instr),
            inner: handler,
        }
    }
}

/// An event-style handler with instrumentation attached.
pub struct WrappedEvent<H> {
    instr: Arc<Instrumentor>,
    inner: H,
}

impl<H, Req, Res> EventHandler<Req, Res> for WrappedEvent<H>
where
    H: EventHandler<Req, Res>,
    Req: RequestMeta,
    Res: EventResponse,
{
    fn call(&self, req: &mut Req, res: &mut Res) {
        let ctx = self.instr.start(&*req, Some(res as &mut dyn HeaderSink));
        let snap = RequestSnapshot::of(&*req);
        let instr = Arc::clone(&self.instr);
        res.on_finished(Box::new(move |view| {
            let disposition = if view.headers_sent() {
                ResponseDisposition::Status(view.status_code())
            } else {
                ResponseDisposition::Unsent
            };
            instr.finish(&snap, ctx, disposition, None);
        }));
        self.inner.call(req, res);
    }
}
