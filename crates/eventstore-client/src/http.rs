//! Default `HttpTransport` backed by `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use eventstore_core::error::EventStoreError;
use eventstore_core::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Sends requests relative to a base URL through a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidArgument` if `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str) -> Result<Self, EventStoreError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a transport around an existing client, e.g. one configured
    /// with timeouts or credentials.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::InvalidArgument` if `base_url` is not an
    /// absolute URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, EventStoreError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            EventStoreError::InvalidArgument(format!("invalid base url {base_url:?}: {e}"))
        })?;
        Ok(Self { client, base_url })
    }

    /// Root every request path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, EventStoreError> {
        let url = self.base_url.join(&request.path).map_err(|e| {
            EventStoreError::InvalidArgument(format!(
                "invalid request path {:?}: {e}",
                request.path
            ))
        })?;

        debug!(method = request.method.as_str(), %url, "sending request");

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EventStoreError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_owned();
        let body = response
            .bytes()
            .await
            .map_err(|e| EventStoreError::transport(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_under_base() {
        let transport = ReqwestTransport::new("http://127.0.0.1:2113/es/").unwrap();
        let url = transport.base_url().join("streams/orders").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:2113/es/streams/orders");
    }

    #[test]
    fn test_stream_name_joins_unescaped() {
        let transport = ReqwestTransport::new("http://127.0.0.1:2113/").unwrap();
        let url = transport.base_url().join("streams/orders?x#y").unwrap();
        assert_eq!(url.path(), "/streams/orders");
        assert_eq!(url.query(), Some("x"));
        assert_eq!(url.fragment(), Some("y"));
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        let err = ReqwestTransport::new("not a url").unwrap_err();
        assert!(matches!(err, EventStoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_methods_map_to_reqwest() {
        assert_eq!(to_reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(Method::Post), reqwest::Method::POST);
        assert_eq!(to_reqwest_method(Method::Delete), reqwest::Method::DELETE);
    }
}
