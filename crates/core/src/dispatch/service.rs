//! Request dispatcher - turns endpoint paths into authenticated requests

use std::sync::Arc;

use chica_common::auth::CredentialStore;
use chica_domain::constants::DEFAULT_INSTANCE_SCHEME;
use chica_domain::{CredentialKey, HttpMethod, OAuthAppConfig};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::endpoints::Endpoint;
use super::errors::{FetchError, Response};
use super::ports::{HttpRequest, HttpResponse, Transport};

/// Dispatcher settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Scheme used to reach instances (`https` outside of tests)
    pub instance_scheme: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { instance_scheme: DEFAULT_INSTANCE_SCHEME.to_string() }
    }
}

impl From<&OAuthAppConfig> for DispatcherConfig {
    fn from(config: &OAuthAppConfig) -> Self {
        Self { instance_scheme: config.instance_scheme.clone() }
    }
}

/// Sends requests to a Mastodon instance and decodes the replies
///
/// The bearer token is read from the credential store on every request, so
/// a sign-in or sign-out is picked up without rebuilding the dispatcher. The
/// token is only attached when the target domain is the stored instance
/// domain. No retries are attempted.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        config: DispatcherConfig,
    ) -> Self {
        Self { transport, credentials, config }
    }

    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Root URL of `domain` (e.g. `https://hyrma.example/`)
    ///
    /// # Errors
    /// `FetchError::UnknownError` when `domain` does not form a valid URL.
    pub fn instance_base(&self, domain: &str) -> Response<Url> {
        Url::parse(&format!("{}://{}/", self.config.instance_scheme, domain))
            .map_err(|e| {
                FetchError::UnknownError(format!("Invalid instance URL for {domain}: {e}"))
            })
    }

    /// Send a request to the stored instance
    ///
    /// # Errors
    /// `FetchError::MissingInstance` when no instance domain is stored,
    /// otherwise see [`Self::send_to`].
    pub async fn send<T, K, V>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(K, V)],
    ) -> Response<T>
    where
        T: DeserializeOwned,
        K: AsRef<str> + Sync,
        V: AsRef<str> + Sync,
    {
        let domain = self.stored_domain().await?;
        self.send_to(&domain, method, path, params).await
    }

    /// Send a request to an explicit instance
    ///
    /// # Errors
    /// - `FetchError::UnknownError` if the transport fails
    /// - `FetchError::Message` for non-2xx statuses
    /// - `FetchError::ParseError` if a 2xx body does not decode into `T`
    #[instrument(skip(self, method, params), fields(method = %method))]
    pub async fn send_to<T, K, V>(
        &self,
        domain: &str,
        method: HttpMethod,
        path: &str,
        params: &[(K, V)],
    ) -> Response<T>
    where
        T: DeserializeOwned,
        K: AsRef<str> + Sync,
        V: AsRef<str> + Sync,
    {
        let url = self.compose_url(domain, path, params)?;
        let mut request = HttpRequest::new(method, url);
        if let Some(token) = self.bearer_for(domain).await {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        debug!(authenticated = request.bearer_token().is_some(), "Dispatching request");

        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(error = %e, "Transport failed");
            FetchError::UnknownError(e.to_string())
        })?;

        debug!(status = response.status, "Received response");
        decode(response)
    }

    /// Send a typed endpoint to the stored instance
    ///
    /// # Errors
    /// Same as [`Self::send`].
    pub async fn fetch<E: Endpoint>(&self, endpoint: &E) -> Response<E::Output> {
        let domain = self.stored_domain().await?;
        self.fetch_from(&domain, endpoint).await
    }

    /// Send a typed endpoint to an explicit instance
    ///
    /// # Errors
    /// Same as [`Self::send_to`].
    pub async fn fetch_from<E: Endpoint>(&self, domain: &str, endpoint: &E) -> Response<E::Output> {
        let params = endpoint.params();
        self.send_to(domain, endpoint.method(), &endpoint.path(), &params).await
    }

    fn compose_url<K, V>(&self, domain: &str, path: &str, params: &[(K, V)]) -> Response<Url>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if !path.starts_with('/') || path.starts_with("//") {
            return Err(FetchError::UnknownError(format!("Path must be instance-relative: {path}")));
        }

        let mut url = self
            .instance_base(domain)?
            .join(path)
            .map_err(|e| FetchError::UnknownError(format!("Invalid path {path}: {e}")))?;

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        Ok(url)
    }

    async fn stored_domain(&self) -> Response<String> {
        self.credentials
            .get(CredentialKey::InstanceDomain)
            .await
            .map_err(|e| FetchError::UnknownError(e.to_string()))?
            .filter(|domain| !domain.is_empty())
            .ok_or(FetchError::MissingInstance)
    }

    /// Stored token, if it belongs to `domain`
    async fn bearer_for(&self, domain: &str) -> Option<String> {
        let token = match self.credentials.get(CredentialKey::AccessToken).await {
            Ok(token) => token.filter(|t| !t.is_empty())?,
            Err(err) => {
                warn!(error = %err, "Could not read access token; sending unauthenticated");
                return None;
            }
        };

        let stored = self.credentials.get(CredentialKey::InstanceDomain).await.ok().flatten()?;
        stored.eq_ignore_ascii_case(domain).then_some(token)
    }
}

/// Classify a raw response and decode its body
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Response<T> {
    if !response.is_success() {
        return Err(FetchError::from_status(response.status, response.body));
    }

    let body = response.body.trim();
    let decoded = if body.is_empty() || matches!(response.status, 204 | 205) {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(body)
    };
    decoded.map_err(|e| FetchError::ParseError(e.to_string()))
}
