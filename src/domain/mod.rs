//! Domain layer for gelf-sender.
//!
//! Contains the types shared across the crate:
//! - `GelfRecord`: the structured log entry written to the wire
//! - `TimestampPrecision`: how the emission time is rendered
//! - `GelfError`: the fatal error taxonomy of a run

pub mod error;
pub mod host;
pub mod message;
pub mod record;

pub use error::GelfError;
pub use host::resolve_host;
pub use message::compose_message;
pub use record::{GelfRecord, Timestamp, TimestampPrecision};
