//! Transport port - the HTTP client seam
//!
//! The executor talks to the network through the `Transport` trait: one
//! call in, one response or one classified error out. `HttpTransport` is
//! the reqwest implementation; tests substitute their own.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::models::{HttpMethod, RequestBody, RequestSpec, ResponseData};

/// Client-wide request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Classified transport failures. Disjoint from cancellation by
/// construction: the executor maps these into `Outcome::Failed` only.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("could not resolve host: {0}")]
    Dns(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("could not read body file {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(String),
}

/// Performs one blocking-style network call per invocation
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseData, TransportError>;
}

/// Reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseData, TransportError> {
        let start = Instant::now();

        let mut req_builder = match request.method {
            HttpMethod::GET => self.client.get(request.url()),
            HttpMethod::POST => self.client.post(request.url()),
            HttpMethod::PUT => self.client.put(request.url()),
            HttpMethod::PATCH => self.client.patch(request.url()),
            HttpMethod::DELETE => self.client.delete(request.url()),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        req_builder = match &request.body {
            RequestBody::Empty => req_builder,
            RequestBody::Text(text) => req_builder.body(text.clone()),
            RequestBody::Form(fields) => {
                let encoded = serde_urlencoded::to_string(fields)
                    .map_err(|e| TransportError::Http(format!("form encoding: {}", e)))?;
                req_builder.body(encoded)
            }
            RequestBody::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| TransportError::File {
                    path: path.clone(),
                    source,
                })?;
                req_builder.body(bytes)
            }
        };

        let resp = req_builder.send().await.map_err(map_reqwest_error)?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).to_string(),
                )
            })
            .collect();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Http(format!("error reading body: {}", e)))?;

        Ok(ResponseData {
            status,
            headers,
            body,
            elapsed: start.elapsed(),
        })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout(REQUEST_TIMEOUT);
    }
    if error.is_connect() {
        let message = error.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("dns") || lowered.contains("resolve") {
            return TransportError::Dns(message);
        }
        return TransportError::Connect(message);
    }
    TransportError::Http(error.to_string())
}
