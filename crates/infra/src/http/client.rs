//! reqwest adapter for the dispatcher's transport port

use std::time::Duration;

use async_trait::async_trait;
use chica_core::{HttpRequest, HttpResponse, Transport, TransportError};
use chica_domain::constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use chica_domain::{ChicaError, HttpMethod, TransportConfig};
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;

use crate::errors::InfraError;

/// reqwest-backed [`Transport`].
///
/// Sends each request exactly once; the dispatcher above it never retries
/// either. Non-2xx statuses are returned as responses, not errors.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ChicaError> {
        Self::builder().build()
    }

    /// Client tuned by the `[transport]` config section.
    pub fn from_config(config: &TransportConfig) -> Result<Self, ChicaError> {
        let mut builder = Self::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = reqwest_method(request.method);
        let url = request.url;

        // Redacted: the query may carry client secrets and codes
        debug!(
            %method,
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "sending HTTP request"
        );

        let mut builder = self.client.request(method.clone(), url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|err| {
            debug!(%method, path = url.path(), error = %err, "HTTP request failed");
            transport_error(&err)
        })?;

        let status = response.status();
        debug!(%method, path = url.path(), %status, "received HTTP response");

        let body = response.text().await.map_err(|err| transport_error(&err))?;
        Ok(HttpResponse::new(status.as_u16(), body))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: None,
            system_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    /// Total time allowed for one request, response body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` and connect directly.
    ///
    /// System proxy settings are honoured unless this is called.
    pub fn no_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }

    pub fn build(self) -> Result<HttpClient, ChicaError> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).connect_timeout(self.connect_timeout);

        if !self.system_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            ChicaError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn transport_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
