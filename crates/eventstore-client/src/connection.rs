//! Connection to a remote event store.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use eventstore_core::error::EventStoreError;
use eventstore_core::event::{ReadEvent, StreamData, WritableEvent};
use eventstore_core::stream::{ExpectedVersion, StreamId};
use eventstore_core::transport::{HttpRequest, HttpTransport};

use crate::config::ConnectionConfig;
use crate::http::ReqwestTransport;
use crate::reader::StreamReader;

/// Media type of an append request body.
pub const EVENTS_CONTENT_TYPE: &str = "application/vnd.eventstore.events+json";

/// Long-lived handle for appending, reading and deleting streams.
///
/// Holds the transport and one reader per direction; carries no other state
/// between calls. Every operation issues exactly one request.
#[derive(Clone)]
pub struct Connection {
    transport: Arc<dyn HttpTransport>,
    forward: StreamReader,
    backward: StreamReader,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("forward", &self.forward)
            .field("backward", &self.backward)
            .finish_non_exhaustive()
    }
}

fn stream_path(stream: &StreamId) -> String {
    format!("streams/{stream}")
}

impl Connection {
    /// Creates a connection over the default transport.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidArgument` if `config.base_url` is not
    /// a valid absolute URL.
    pub fn create(config: &ConnectionConfig) -> Result<Self, EventStoreError> {
        let transport = ReqwestTransport::new(&config.base_url)?;
        debug!(base_url = %config.base_url, "event store connection created");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Creates a connection over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            forward: StreamReader::forward(Arc::clone(&transport)),
            backward: StreamReader::backward(Arc::clone(&transport)),
            transport,
        }
    }

    /// Appends `events` to `stream` if the stream is at `expected_version`.
    ///
    /// The batch is sent as one request and is written or rejected as a
    /// whole. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Concurrency` if the store rejects the
    /// expected version (400), and `EventStoreError::Transport` for any other
    /// status but 201 or if the request fails.
    #[instrument(skip(self, stream, events), fields(stream = %stream, events = events.len()))]
    pub async fn append_to_stream(
        &self,
        stream: &StreamId,
        expected_version: ExpectedVersion,
        events: &[WritableEvent],
    ) -> Result<(), EventStoreError> {
        let payload: Vec<StreamData> = events.iter().map(WritableEvent::to_stream_data).collect();
        let body = serde_json::to_vec(&payload).map_err(|e| {
            EventStoreError::InvalidArgument(format!("events could not be encoded: {e}"))
        })?;

        let request = HttpRequest::post(stream_path(stream))
            .with_header("Content-Type", EVENTS_CONTENT_TYPE)
            .with_header("ES-ExpectedVersion", expected_version.header_value())
            .with_body(body);

        let response = self.transport.send(request).await?;
        match response.status {
            201 => {
                debug!(%expected_version, "events appended");
                Ok(())
            }
            400 => {
                warn!(
                    %expected_version,
                    reason = %response.reason,
                    "append rejected by version check"
                );
                Err(EventStoreError::Concurrency(response.reason))
            }
            status => {
                warn!(status, reason = %response.reason, "append failed");
                Err(EventStoreError::unexpected_status(status, response.reason))
            }
        }
    }

    /// Reads up to `count` events from `start` towards the stream head.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Transport` if the read fails.
    pub async fn read_stream_events_forward(
        &self,
        stream: &StreamId,
        start: u64,
        count: u64,
        resolve_link_tos: bool,
    ) -> Result<Vec<ReadEvent>, EventStoreError> {
        self.forward
            .read_stream_events(stream, start, count, resolve_link_tos)
            .await
    }

    /// Reads up to `count` events from `start` towards the stream start.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Transport` if the read fails.
    pub async fn read_stream_events_backward(
        &self,
        stream: &StreamId,
        start: u64,
        count: u64,
        resolve_link_tos: bool,
    ) -> Result<Vec<ReadEvent>, EventStoreError> {
        self.backward
            .read_stream_events(stream, start, count, resolve_link_tos)
            .await
    }

    /// Deletes `stream`. A soft delete can be undone by the store; a hard
    /// delete is permanent.
    ///
    /// The response status is not interpreted. A non-2xx answer is only
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Transport` only if the request itself fails.
    #[instrument(skip(self, stream), fields(stream = %stream))]
    pub async fn delete_stream(
        &self,
        stream: &StreamId,
        hard_delete: bool,
    ) -> Result<(), EventStoreError> {
        let mut request = HttpRequest::delete(stream_path(stream))
            .with_header("Content-Type", "application/json");
        if hard_delete {
            request = request.with_header("ES-HardDelete", "true");
        }

        let response = self.transport.send(request).await?;
        if response.is_success() {
            debug!(hard_delete, "stream deleted");
        } else {
            // TODO: map delete statuses onto EventStoreError once callers can
            // tell "already deleted" apart from a failure.
            warn!(
                status = response.status,
                reason = %response.reason,
                "stream delete not accepted"
            );
        }
        Ok(())
    }
}
