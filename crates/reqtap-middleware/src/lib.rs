//! reqtap middleware: adapters, config, and collaborator implementations.
//!
//! This crate wires the core instrumentation into concrete hosts: the
//! event- and future-style adapters, an Axum integration, strict YAML
//! config, a tracing-backed logger, and an in-process stats sink. It is
//! intended to be consumed by embedding services and by integration
//! tests; the transport-agnostic logic lives in `reqtap-core`.

pub mod adapt;
pub mod config;
pub mod logger;
pub mod stats;
pub mod tap;

pub use tap::{ReqTap, ReqTapBuilder};
