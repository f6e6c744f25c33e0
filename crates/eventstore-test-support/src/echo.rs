//! In-memory echo store — an `HttpTransport` that keeps appended events and
//! serves them back as stream feeds.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eventstore_core::error::EventStoreError;
use eventstore_core::event::StreamData;
use eventstore_core::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use serde_json::{Value, json};

/// A transport that behaves like a tiny event store. Appends are checked
/// against `ES-ExpectedVersion`, reads return pages newest first with
/// payloads embedded as JSON text, and deletes drop the stream.
#[derive(Debug, Default)]
pub struct EchoTransport {
    streams: Mutex<HashMap<String, Vec<StreamData>>>,
}

impl EchoTransport {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events stored in `stream`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stream(&self, stream: &str) -> Vec<StreamData> {
        self.streams
            .lock()
            .unwrap()
            .get(stream)
            .cloned()
            .unwrap_or_default()
    }

    fn append(&self, stream: &str, request: &HttpRequest) -> HttpResponse {
        let Some(body) = request.body.as_deref() else {
            return HttpResponse::new(400, "Must include an event");
        };
        let Ok(events) = serde_json::from_slice::<Vec<StreamData>>(body) else {
            return HttpResponse::new(400, "Write request body invalid");
        };

        let mut streams = self.streams.lock().unwrap();
        let current = streams.get(stream).map(Vec::len);
        let accepted = match request.header("ES-ExpectedVersion") {
            None | Some("-2") => true,
            Some("-1") => current.is_none(),
            Some(version) => version
                .parse::<usize>()
                .is_ok_and(|v| current.is_some_and(|len| len == v + 1)),
        };
        if !accepted {
            return HttpResponse::new(400, "Wrong expected EventNumber");
        }

        streams.entry(stream.to_owned()).or_default().extend(events);
        HttpResponse::new(201, "Created")
    }

    fn read(&self, stream: &str, start: usize, direction: &str, count: usize) -> HttpResponse {
        let streams = self.streams.lock().unwrap();
        let Some(events) = streams.get(stream) else {
            return HttpResponse::new(404, "Not Found");
        };

        let range = match direction {
            "forward" => start.min(events.len())..start.saturating_add(count).min(events.len()),
            "backward" if !events.is_empty() => {
                let last = start.min(events.len() - 1);
                (last + 1).saturating_sub(count)..last + 1
            }
            "backward" => 0..0,
            _ => return HttpResponse::new(400, "Bad Request"),
        };

        let entries: Vec<Value> = range
            .rev()
            .map(|number| entry(stream, number, &events[number]))
            .collect();
        let feed = json!({
            "title": format!("Event stream '{stream}'"),
            "streamId": stream,
            "entries": entries,
        });

        HttpResponse::new(200, "OK").with_body(feed.to_string())
    }

    fn delete(&self, stream: &str) -> HttpResponse {
        match self.streams.lock().unwrap().remove(stream) {
            Some(_) => HttpResponse::new(204, "Stream deleted"),
            None => HttpResponse::new(404, "Not Found"),
        }
    }
}

fn entry(stream: &str, number: usize, event: &StreamData) -> Value {
    json!({
        "eventId": event.event_id,
        "eventType": event.event_type,
        "eventNumber": number,
        "streamId": stream,
        "isJson": true,
        "data": event.data.to_string(),
        "metaData": event.metadata.to_string(),
        "title": format!("{number}@{stream}"),
        "updated": "2026-01-15T10:00:00.000000Z",
    })
}

#[async_trait]
impl HttpTransport for EchoTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, EventStoreError> {
        let path = request.path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').collect();

        let response = match (request.method, segments.as_slice()) {
            (Method::Post, ["streams", stream]) => self.append(stream, &request),
            (Method::Delete, ["streams", stream]) => self.delete(stream),
            (Method::Get, ["streams", stream, start, direction, count]) => {
                match (start.parse::<usize>(), count.parse::<usize>()) {
                    (Ok(start), Ok(count)) => self.read(stream, start, direction, count),
                    _ => HttpResponse::new(400, "Bad Request"),
                }
            }
            _ => HttpResponse::new(404, "Not Found"),
        };
        Ok(response)
    }
}
