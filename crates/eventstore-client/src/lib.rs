//! EventStore HTTP client.
//!
//! `Connection` appends events with optimistic concurrency, pages through
//! streams in either direction and deletes streams. All network access goes
//! through an `HttpTransport`, by default the reqwest-backed
//! `ReqwestTransport`.

pub mod config;
pub mod connection;
pub mod feed;
pub mod http;
pub mod reader;

pub use config::ConnectionConfig;
pub use connection::Connection;
pub use eventstore_core::error::EventStoreError;
pub use eventstore_core::event::{ReadEvent, StreamData, WritableEvent};
pub use eventstore_core::stream::{ExpectedVersion, ReadDirection, StreamId};
pub use eventstore_core::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
pub use http::ReqwestTransport;
pub use reader::StreamReader;
