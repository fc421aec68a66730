//! Structured logging for the lecture listing.
//!
//! - [`StructuredLogger`]: per-request logger emitting `tracing` events
//! - [`RequestId`]: correlation id attached to every entry and request
//! - [`init_tracing`]: installs the stderr subscriber (human or JSON)

pub mod logging;
pub mod request_id;
pub mod subscriber;

pub use logging::{LogBuilder, LogEntry, LogLevel, StructuredLogger};
pub use request_id::RequestId;
pub use subscriber::{init_tracing, LogFormat};

/// Errors raised while configuring logging.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid log format: {0} (expected human or json)")]
    InvalidFormat(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}
