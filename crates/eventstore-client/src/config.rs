//! Connection configuration.

/// Root endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:2113/";

/// Environment variable that overrides the base URL.
pub const BASE_URL_ENV: &str = "EVENTSTORE_URL";

/// Settings for building a `Connection` over the default transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Root endpoint of the store. Always ends with `/`.
    pub base_url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl ConnectionConfig {
    /// Reads `EVENTSTORE_URL`, falling back to the default endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(BASE_URL_ENV).ok())
    }

    /// Builds a config from the raw `EVENTSTORE_URL` value. A missing or
    /// blank value keeps the default endpoint.
    #[must_use]
    pub fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// Replaces the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }
}
