//! Parsing of the store's atom+json stream feed.
//!
//! A page looks like `{"entries": [{"eventNumber": 3, "eventType": ...,
//! "data": "{\"a\":1}", "isJson": true, ...}], "links": [...]}`. Only the
//! entries are interesting to the client.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use eventstore_core::error::EventStoreError;
use eventstore_core::event::ReadEvent;

/// Media type requested for stream pages.
pub const FEED_CONTENT_TYPE: &str = "application/vnd.eventstore.atom+json";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    event_number: u64,
    event_type: String,
    stream_id: String,
    #[serde(default)]
    position_event_number: Option<u64>,
    #[serde(default)]
    event_id: Option<Uuid>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    meta_data: Option<Value>,
    #[serde(default)]
    is_json: bool,
    #[serde(default)]
    updated: Option<DateTime<Utc>>,
}

impl Entry {
    fn into_read_event(self) -> ReadEvent {
        ReadEvent {
            stream_id: self.stream_id,
            event_number: self.event_number,
            position: self.position_event_number.unwrap_or(self.event_number),
            event_type: self.event_type,
            event_id: self.event_id,
            data: decode_payload(self.data, self.is_json),
            metadata: decode_payload(self.meta_data, self.is_json),
            updated: self.updated,
        }
    }
}

/// Embedded payloads arrive as JSON text; inline values are kept as-is.
fn decode_payload(raw: Option<Value>, is_json: bool) -> Value {
    match raw {
        None => Value::Null,
        Some(Value::String(text)) if is_json => {
            serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text))
        }
        Some(value) => value,
    }
}

/// Parses one feed page into events, in the order the page lists them.
///
/// # Errors
///
/// Returns `EventStoreError::Transport` if the body is not a feed document.
pub fn parse_feed(body: &[u8]) -> Result<Vec<ReadEvent>, EventStoreError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let feed: Feed = serde_json::from_slice(body)
        .map_err(|e| EventStoreError::transport(format!("malformed stream feed: {e}")))?;

    Ok(feed.entries.into_iter().map(Entry::into_read_event).collect())
}
