//! Host adapters bridging request lifecycles into start/finish.
//!
//! Two shapes cover the hosts we target: a response object that signals
//! completion through a one-time finished event (`event`), and a handler
//! that returns a future (`future`). Both share one `Instrumentor` via
//! injection; which one an embedding service uses is a configuration-time
//! choice. `axum` layers the lifecycle onto an Axum router.

pub mod axum;
pub mod event;
pub mod future;

pub use event::{EventHandler, EventResponse, EventTap, FinishListener, ResponseView, WrappedEvent};
pub use future::{FutureTap, Handler, HintedHandler, StatusHint, WrappedHandler};

/// Narrow adapter seam: turn a handler into its instrumented counterpart.
pub trait Wrap<H> {
    type Wrapped;
    fn wrap(&self, handler: H) -> Self::Wrapped;
}
