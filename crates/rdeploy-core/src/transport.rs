use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    /// First value of `name`, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Failure to obtain a response at all (DNS, connect, timeout, body read).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {url} failed: {details}")]
pub struct TransportError {
    pub url: String,
    pub details: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            details: details.into(),
        }
    }

    pub fn from_error<E>(url: &str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::new(url, error.to_string())
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET and read the whole response.
    ///
    /// A non-success status is returned as a response, not as an error.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with request and connect timeouts.
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built (for
    /// example when the TLS backend fails to initialize).
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(format!("rdeploy/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_error(url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_error(url, e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, LAST_MODIFIED};

    use super::{HttpResponse, StatusCode, TransportError};

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LAST_MODIFIED,
            HeaderValue::from_static("Mon, 01 Jan 2024 00:00:00 GMT"),
        );
        let response = HttpResponse {
            status: StatusCode::OK,
            headers,
            body: String::new(),
        };

        assert_eq!(
            response.header("Last-Modified"),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );
        assert!(response.header("etag").is_none());
    }

    #[test]
    fn transport_error_display_includes_url() {
        let error = TransportError::new("https://example.test/version", "connection refused");
        assert_eq!(
            error.to_string(),
            "request to https://example.test/version failed: connection refused"
        );
    }
}
