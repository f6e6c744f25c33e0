//! Stream identifiers and positions.

use std::fmt;

use crate::error::EventStoreError;

/// Name of a stream in the store. Opaque to the client and never empty.
///
/// The name goes into request paths unescaped, so `?`, `#` and `..` in a
/// name are read as a query, a fragment or a path step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamId(String);

impl StreamId {
    /// Creates a stream identifier.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidArgument` if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, EventStoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EventStoreError::InvalidArgument(
                "stream name must not be empty".into(),
            ));
        }
        Ok(Self(name))
    }

    /// Returns the stream name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StreamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for StreamId {
    type Error = EventStoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for StreamId {
    type Error = EventStoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Version the caller believes the stream is at, sent as
/// `ES-ExpectedVersion`. The store decides whether it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Append regardless of the current version.
    Any,
    /// The stream must not exist yet.
    NoStream,
    /// The last event in the stream has this number.
    Exact(u64),
}

impl ExpectedVersion {
    /// Wire value of the `ES-ExpectedVersion` header.
    #[must_use]
    pub fn header_value(self) -> String {
        match self {
            Self::Any => "-2".to_owned(),
            Self::NoStream => "-1".to_owned(),
            Self::Exact(n) => n.to_string(),
        }
    }
}

impl fmt::Display for ExpectedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value())
    }
}

impl From<u64> for ExpectedVersion {
    fn from(version: u64) -> Self {
        Self::Exact(version)
    }
}

/// Direction a stream is paged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDirection {
    /// Towards higher event numbers.
    Forward,
    /// Towards lower event numbers.
    Backward,
}

impl ReadDirection {
    /// URL segment the store uses for this direction.
    #[must_use]
    pub fn as_path_segment(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}
