//! Shared error types across reqtap crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqTapError>;

/// Errors raised by reqtap itself (configuration, assembly).
///
/// Instrumentation of a live request never returns one of these; the
/// finish phase is terminal and infallible by contract.
#[derive(Debug, Error)]
pub enum ReqTapError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Error surfaced by a wrapped request handler.
///
/// Handlers fail in two shapes: rejections carrying an explicit response
/// status (custom 4xx errors) and everything else, which always
/// classifies as a 500.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Failure carrying an explicit response status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// Failure with no status attached.
    #[error("{0}")]
    Unexpected(String),
}

impl HandlerError {
    /// Failure with an explicit response status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        HandlerError::Status {
            status,
            message: message.into(),
        }
    }

    /// Failure with no status attached.
    pub fn unexpected(message: impl Into<String>) -> Self {
        HandlerError::Unexpected(message.into())
    }

    /// The explicit status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HandlerError::Status { status, .. } => Some(*status),
            HandlerError::Unexpected(_) => None,
        }
    }
}
