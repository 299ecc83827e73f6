use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Semaphore;

use crate::transport::{HttpResponse, HttpTransport, TransportError};

/// Canned transport: routed URLs answer with fixed responses, everything
/// else fails as unreachable. Every requested URL is recorded. Gated URLs
/// wait for a permit before answering.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: HashMap<String, HttpResponse>,
    gates: HashMap<String, Arc<Semaphore>>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, url: &str, status: StatusCode, body: &str) -> Self {
        self.respond_with_headers(url, status, body, &[])
    }

    pub(crate) fn respond_with_headers(
        mut self,
        url: &str,
        status: StatusCode,
        body: &str,
        headers: &[(&'static str, &'static str)],
    ) -> Self {
        let mut header_map = HeaderMap::new();
        for &(name, value) in headers {
            header_map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        self.routes.insert(
            url.to_string(),
            HttpResponse {
                status,
                headers: header_map,
                body: body.to_string(),
            },
        );
        self
    }

    /// Hold requests to `url` until permits are added to the returned gate.
    pub(crate) fn gate(&mut self, url: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.insert(url.to_string(), gate.clone());
        gate
    }

    pub(crate) fn fail(mut self, url: &str) -> Self {
        self.routes.remove(url);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn clear_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(url.to_string());

        if let Some(gate) = self.gates.get(url) {
            let _permit = gate.acquire().await;
        }

        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::new(url, "connection refused"))
    }
}
