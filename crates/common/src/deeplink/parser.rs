//! Deep-link parser

use url::Url;

use super::error::DeeplinkError;
use super::types::{Deeplink, DeeplinkKind};

/// Parses deep links for a single application scheme
#[derive(Debug, Clone)]
pub struct DeeplinkParser {
    expected_scheme: String,
}

impl DeeplinkParser {
    /// Create a parser accepting links under `expected_scheme` (e.g. `myapp`)
    pub fn new(expected_scheme: impl Into<String>) -> Self {
        Self { expected_scheme: expected_scheme.into() }
    }

    #[must_use]
    pub fn expected_scheme(&self) -> &str {
        &self.expected_scheme
    }

    /// Validate `uri` and extract its payload
    ///
    /// Checks run in a fixed order: scheme, host, parameter count, then the
    /// kind's named parameter. Parameters beyond the required one are ignored.
    ///
    /// # Errors
    /// Returns the first [`DeeplinkError`] the URI trips over.
    pub fn parse(&self, uri: &str) -> Result<Deeplink, DeeplinkError> {
        let url = Url::parse(uri).map_err(|e| DeeplinkError::InvalidUri(e.to_string()))?;

        if !url.scheme().eq_ignore_ascii_case(&self.expected_scheme) {
            return Err(DeeplinkError::UnknownScheme {
                expected: self.expected_scheme.clone(),
                received: url.scheme().to_string(),
            });
        }

        let host = url.host_str().unwrap_or_default();
        let kind = DeeplinkKind::from_host(host)
            .ok_or_else(|| DeeplinkError::UnknownDeeplink(host.to_string()))?;

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let expecting = kind.expected_parameters();

        if expecting > 0 && params.is_empty() {
            return Err(DeeplinkError::ExpectedQueryParameters { expecting, received: 0 });
        }
        if expecting == 0 && !params.is_empty() {
            return Err(DeeplinkError::ExpectedQueryParameters {
                expecting: 0,
                received: params.len(),
            });
        }

        let Some(name) = kind.required_parameter() else {
            return Ok(kind.payload(String::new()));
        };

        params
            .into_iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| kind.payload(value))
            .ok_or_else(|| DeeplinkError::UnknownQueryParameter { expecting: name.to_string() })
    }
}
