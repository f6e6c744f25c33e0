//! Paged stream reads.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use eventstore_core::error::EventStoreError;
use eventstore_core::event::ReadEvent;
use eventstore_core::stream::{ReadDirection, StreamId};
use eventstore_core::transport::{HttpRequest, HttpTransport};

use crate::feed::{FEED_CONTENT_TYPE, parse_feed};

/// Reads one page of a stream in a fixed direction.
#[derive(Clone)]
pub struct StreamReader {
    direction: ReadDirection,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for StreamReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamReader")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl StreamReader {
    /// Creates a reader paging in `direction` over `transport`.
    #[must_use]
    pub fn new(direction: ReadDirection, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            direction,
            transport,
        }
    }

    /// Reader towards higher event numbers.
    #[must_use]
    pub fn forward(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(ReadDirection::Forward, transport)
    }

    /// Reader towards lower event numbers.
    #[must_use]
    pub fn backward(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(ReadDirection::Backward, transport)
    }

    /// Direction this reader pages in.
    #[must_use]
    pub fn direction(&self) -> ReadDirection {
        self.direction
    }

    /// Path of the page starting at `start` holding at most `count` events.
    #[must_use]
    pub fn page_path(&self, stream: &StreamId, start: u64, count: u64) -> String {
        format!(
            "streams/{stream}/{start}/{}/{count}?embed=body",
            self.direction.as_path_segment()
        )
    }

    /// Reads up to `count` events starting at `start` (inclusive).
    ///
    /// Events come back in ascending position order for a forward reader
    /// and descending for a backward one. Resolved links are ordered by
    /// their position in `stream`, not by their target's event number. A range with no events
    /// yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Transport` if the request fails, the store
    /// answers with a non-2xx status or the page cannot be parsed.
    #[instrument(skip(self, stream), fields(stream = %stream, direction = ?self.direction))]
    pub async fn read_stream_events(
        &self,
        stream: &StreamId,
        start: u64,
        count: u64,
        resolve_link_tos: bool,
    ) -> Result<Vec<ReadEvent>, EventStoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let request = HttpRequest::get(self.page_path(stream, start, count))
            .with_header("Accept", FEED_CONTENT_TYPE)
            .with_header("ES-ResolveLinkTos", resolve_link_tos.to_string());

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, reason = %response.reason, "stream read rejected");
            return Err(EventStoreError::unexpected_status(
                response.status,
                response.reason,
            ));
        }

        let mut events = parse_feed(&response.body)?;
        // Pages list newest first whatever the direction.
        match self.direction {
            ReadDirection::Forward => events.sort_by_key(|e| e.position),
            ReadDirection::Backward => events.sort_by_key(|e| Reverse(e.position)),
        }

        debug!(events = events.len(), "stream page read");
        Ok(events)
    }
}
