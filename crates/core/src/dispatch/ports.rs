//! Port interface for the HTTP transport
//!
//! Core never talks to the network itself. The dispatcher builds an
//! [`HttpRequest`], hands it to a [`Transport`], and decodes whatever comes
//! back. Production code plugs in the reqwest adapter from `chica-infra`;
//! tests plug in [`crate::testing::MockTransport`].

use async_trait::async_trait;
use chica_domain::{ChicaError, HttpMethod};
use thiserror::Error;
use url::Url;

/// Fully resolved outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self { method, url, headers: Vec::new() }
    }

    /// Append a header (builder style)
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header named `name` (case-insensitive)
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Token carried in `Authorization: Bearer <token>`, if any
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header_value("Authorization")?.strip_prefix("Bearer ").filter(|t| !t.is_empty())
    }
}

/// Raw response: status code plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure before any HTTP status was received
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Only produced by test doubles for requests nothing is mapped to
    #[error("No endpoint mapped for {method} {url}")]
    UnknownEndpoint { method: HttpMethod, url: String },

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<TransportError> for ChicaError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.to_string())
    }
}

/// Executes HTTP requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response
    ///
    /// Non-2xx statuses are NOT errors at this layer; they come back as an
    /// [`HttpResponse`] for the dispatcher to classify.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
