//! Client error types.

use thiserror::Error;

/// Top-level error type for every client operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventStoreError {
    /// The store rejected an append because the expected version did not
    /// match the stream head.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// The store answered with an unexpected status, or the request never
    /// produced a usable response.
    #[error("transport error: {reason}")]
    Transport {
        /// HTTP status, absent when the failure happened below HTTP.
        status: Option<u16>,
        /// Reason phrase or underlying failure description.
        reason: String,
    },

    /// A caller-supplied value failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EventStoreError {
    /// A failure that never produced an HTTP status.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            reason: reason.into(),
        }
    }

    /// A response whose status the operation does not accept.
    pub fn unexpected_status(status: u16, reason: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_display_includes_reason() {
        let err = EventStoreError::Concurrency("Wrong expected EventNumber".into());
        assert_eq!(
            err.to_string(),
            "concurrency conflict: Wrong expected EventNumber"
        );
    }

    #[test]
    fn test_unexpected_status_keeps_code() {
        let err = EventStoreError::unexpected_status(503, "Service Unavailable");
        assert_eq!(
            err,
            EventStoreError::Transport {
                status: Some(503),
                reason: "Service Unavailable".into(),
            }
        );
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = EventStoreError::transport("connection refused");
        assert!(matches!(err, EventStoreError::Transport { status: None, .. }));
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
