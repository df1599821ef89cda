//! reqtap core: transport-agnostic request instrumentation primitives.
//!
//! This crate defines the instrumentation lifecycle (start/finish), the
//! collaborator traits it emits through, and the pure helpers shared by
//! every adapter: path normalization, request id generation, and
//! completion classification. It carries no framework or runtime
//! dependencies so adapters for different hosts can reuse it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Instrumentation runs inside the response path of production services;
//! all fallible paths must surface as `ReqTapError`/`Result`, and
//! collaborator calls are shielded so a faulty Logger or Stats backend
//! cannot take a request down with it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod collab;
pub mod context;
pub mod error;
pub mod instrument;
pub mod outcome;
pub mod path;
pub mod request_id;

pub use collab::{HeaderSink, LogFields, Logger, RequestMeta, RequestSnapshot, Stats};
pub use context::RequestContext;
pub use error::{HandlerError, ReqTapError, Result};
pub use instrument::{Instrumentor, ResponseDisposition, REQUEST_ID_HEADER, SLOW_RESPONSE_MS};
pub use outcome::CompletionOutcome;
