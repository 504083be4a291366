//! Configuration structures
//!
//! Every section implements `Default`, so a partially written config file
//! only needs to mention the values it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLIENT_NAME, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_INSTANCE_SCHEME,
    DEFAULT_KEYCHAIN_SERVICE, DEFAULT_REDIRECT_URI, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCOPES,
    DEFAULT_WEBSITE,
};

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oauth: OAuthAppConfig,
    pub transport: TransportConfig,
    pub keychain: KeychainConfig,
    pub policy: PolicyConfig,
}

/// How the client registers itself with Mastodon instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthAppConfig {
    /// Application name shown on the instance's authorization page
    pub client_name: String,
    pub website: String,
    /// Custom-scheme URI the instance redirects to (e.g. `starlight://oauth`)
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Scheme used to reach instances; only tests point this at `http`
    pub instance_scheme: String,
}

impl Default for OAuthAppConfig {
    fn default() -> Self {
        Self {
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            website: DEFAULT_WEBSITE.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            instance_scheme: DEFAULT_INSTANCE_SCHEME.to_string(),
        }
    }
}

impl OAuthAppConfig {
    /// Scopes joined the way Mastodon expects them (`read write follow push`)
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Scheme part of the redirect URI, used to validate inbound deep links
    #[must_use]
    pub fn url_scheme(&self) -> &str {
        self.redirect_uri.split_once("://").map_or(self.redirect_uri.as_str(), |(scheme, _)| scheme)
    }
}

/// HTTP transport tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// Secure storage namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeychainConfig {
    pub service_name: String,
}

impl Default for KeychainConfig {
    fn default() -> Self {
        Self { service_name: DEFAULT_KEYCHAIN_SERVICE.to_string() }
    }
}

/// Sign-in policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Instances the client refuses to start an authorization flow with
    pub rejected_domains: Vec<String>,
}

impl PolicyConfig {
    /// Case-insensitive exact match against the rejection list
    ///
    /// A trailing root dot on either side is ignored, so `bad.example.` and
    /// `bad.example` name the same instance.
    #[must_use]
    pub fn is_rejected(&self, domain: &str) -> bool {
        let domain = domain.trim_end_matches('.');
        self.rejected_domains
            .iter()
            .any(|rejected| rejected.trim_end_matches('.').eq_ignore_ascii_case(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scopes_join_with_spaces() {
        let config = OAuthAppConfig::default();
        assert_eq!(config.scope_string(), "read write follow push");
    }

    #[test]
    fn url_scheme_comes_from_redirect_uri() {
        let config = OAuthAppConfig { redirect_uri: "myapp://oauth".into(), ..Default::default() };
        assert_eq!(config.url_scheme(), "myapp");
    }

    #[test]
    fn rejection_is_case_insensitive() {
        let policy = PolicyConfig { rejected_domains: vec!["Bad.Example".into()] };
        assert!(policy.is_rejected("bad.example"));
        assert!(!policy.is_rejected("good.example"));
    }

    #[test]
    fn rejection_ignores_trailing_root_dot() {
        let policy = PolicyConfig {
            rejected_domains: vec!["bad.example".into(), "worse.example.".into()],
        };
        assert!(policy.is_rejected("bad.example."));
        assert!(policy.is_rejected("worse.example"));
        assert!(!policy.is_rejected("notbad.example"));
    }

    #[test]
    fn partial_sections_fill_from_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"policy": {"rejected_domains": ["x.example"]}}"#).unwrap();
        assert_eq!(config.oauth, OAuthAppConfig::default());
        assert_eq!(config.policy.rejected_domains, vec!["x.example".to_string()]);
    }
}
