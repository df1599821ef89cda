//! Top-level facade crate for reqtap.
//!
//! Re-exports the core primitives and the middleware layer so users can
//! depend on a single crate.

pub mod core {
    pub use reqtap_core::*;
}

pub mod middleware {
    pub use reqtap_middleware::*;
}
