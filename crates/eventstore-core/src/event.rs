//! Events written to and read from a stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::EventStoreError;

/// Wire shape of one event inside an append request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamData {
    /// Client-generated event identifier.
    pub event_id: Uuid,
    /// Event type name.
    pub event_type: String,
    /// Event payload.
    pub data: Value,
    /// Event metadata, `{}` when none was supplied.
    pub metadata: Value,
}

/// An event waiting to be appended to a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct WritableEvent {
    id: Uuid,
    event_type: String,
    data: Value,
    metadata: Value,
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Metadata values that count as "nothing supplied" and become `{}`.
fn is_blank_metadata(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Bool(true) | Value::Object(_) => false,
    }
}

impl WritableEvent {
    /// Creates an event with a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidArgument` if `data` is not a JSON
    /// object or array.
    pub fn new_instance(
        event_type: impl Into<String>,
        data: Value,
        metadata: Option<Value>,
    ) -> Result<Self, EventStoreError> {
        Self::new(Uuid::new_v4(), event_type, data, metadata)
    }

    /// Creates an event with a caller-chosen identifier.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidArgument` if `data` is not a JSON
    /// object or array.
    pub fn new(
        id: Uuid,
        event_type: impl Into<String>,
        data: Value,
        metadata: Option<Value>,
    ) -> Result<Self, EventStoreError> {
        if !is_container(&data) {
            return Err(EventStoreError::InvalidArgument(
                "data expected object or array".into(),
            ));
        }
        // FIXME: this guard tests `data`, so scalar metadata passes through.
        let has_metadata = metadata.as_ref().is_some_and(|m| !m.is_null());
        if has_metadata && !is_container(&data) {
            return Err(EventStoreError::InvalidArgument(
                "metadata expected object, array or null".into(),
            ));
        }

        let metadata = match metadata {
            Some(value) if !is_blank_metadata(&value) => value,
            _ => Value::Object(serde_json::Map::new()),
        };

        Ok(Self {
            id,
            event_type: event_type.into(),
            data,
            metadata,
        })
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the payload.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the metadata.
    #[must_use]
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Converts the event into its wire representation.
    #[must_use]
    pub fn to_stream_data(&self) -> StreamData {
        StreamData {
            event_id: self.id,
            event_type: self.event_type.clone(),
            data: self.data.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// An event as returned by a stream read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadEvent {
    /// Stream the event was read from. For resolved links this is the
    /// stream of the target event.
    pub stream_id: String,
    /// Position of the event within its stream.
    pub event_number: u64,
    /// Position within the stream that was read. Equals `event_number`
    /// unless a link was resolved to an event in another stream.
    pub position: u64,
    /// Event type name.
    pub event_type: String,
    /// Identifier assigned when the event was written, if the feed carried it.
    pub event_id: Option<Uuid>,
    /// Payload. JSON when the store flagged it as such, otherwise the raw
    /// text as a string. `Null` when the feed omitted it.
    pub data: Value,
    /// Metadata, same encoding rules as `data`.
    pub metadata: Value,
    /// When the store recorded the event.
    pub updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_instance_generates_identity_and_empty_metadata() {
        let event =
            WritableEvent::new_instance("OrderPlaced", json!({"total": 12}), None).unwrap();
        let wire = event.to_stream_data();

        assert!(!wire.event_id.is_nil());
        assert_eq!(wire.event_type, "OrderPlaced");
        assert_eq!(wire.data, json!({"total": 12}));
        assert_eq!(wire.metadata, json!({}));
    }

    #[test]
    fn test_new_instance_ids_are_unique() {
        let a = WritableEvent::new_instance("A", json!({}), None).unwrap();
        let b = WritableEvent::new_instance("A", json!({}), None).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_array_data_is_accepted() {
        let event = WritableEvent::new_instance("Batch", json!([1, 2, 3]), None).unwrap();
        assert_eq!(event.data(), &json!([1, 2, 3]));
    }

    #[test]
    fn test_scalar_data_is_rejected() {
        for data in [json!(42), json!("text"), json!(true), Value::Null] {
            let err = WritableEvent::new_instance("Bad", data, None).unwrap_err();
            assert!(matches!(err, EventStoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_supplied_metadata_is_kept() {
        let id = Uuid::new_v4();
        let event = WritableEvent::new(
            id,
            "OrderPlaced",
            json!({"total": 12}),
            Some(json!({"user": "ada"})),
        )
        .unwrap();

        assert_eq!(event.id(), id);
        assert_eq!(event.metadata(), &json!({"user": "ada"}));
    }

    #[test]
    fn test_null_metadata_becomes_empty_object() {
        let event =
            WritableEvent::new_instance("OrderPlaced", json!({}), Some(Value::Null)).unwrap();
        assert_eq!(event.metadata(), &json!({}));
    }

    #[test]
    fn test_blank_scalar_metadata_becomes_empty_object() {
        for metadata in [json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([])] {
            let event =
                WritableEvent::new_instance("OrderPlaced", json!({}), Some(metadata)).unwrap();
            assert_eq!(event.metadata(), &json!({}));
        }
    }

    #[test]
    fn test_non_blank_scalar_metadata_is_kept() {
        for metadata in [json!(true), json!(1), json!("00"), json!([0])] {
            let event =
                WritableEvent::new_instance("OrderPlaced", json!({}), Some(metadata.clone()))
                    .unwrap();
            assert_eq!(event.metadata(), &metadata);
        }
    }

    #[test]
    fn test_scalar_metadata_passes_validation() {
        let event =
            WritableEvent::new_instance("OrderPlaced", json!({}), Some(json!("note"))).unwrap();
        assert_eq!(event.metadata(), &json!("note"));
    }

    #[test]
    fn test_stream_data_serializes_with_wire_field_names() {
        let id = Uuid::new_v4();
        let event = WritableEvent::new(id, "OrderPlaced", json!({"total": 12}), None).unwrap();

        let wire = serde_json::to_value(event.to_stream_data()).unwrap();

        assert_eq!(
            wire,
            json!({
                "eventId": id.to_string(),
                "eventType": "OrderPlaced",
                "data": {"total": 12},
                "metadata": {}
            })
        );
    }
}
