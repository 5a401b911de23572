//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the I/O half of the host-does-IO split: `BooksClient` never
//! performs a round-trip itself. `ReqwestTransport` is the default; tests and
//! native hosts can bring their own.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one round-trip. Non-2xx statuses are returned as data, not as
    /// errors; only failures below HTTP produce `ApiError::Transport`.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `reqwest::Client` with its default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.client.get(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(url = %request.url, status, bytes = body.len(), "round-trip complete");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
