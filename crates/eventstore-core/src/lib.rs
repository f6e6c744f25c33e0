//! EventStore Core — value objects shared by the HTTP client.
//!
//! This crate defines the events, stream identifiers, error taxonomy and the
//! transport seam the client talks through. It contains no network code.

pub mod error;
pub mod event;
pub mod stream;
pub mod transport;
