//! Authentication session
//!
//! [`SessionMachine`] owns the sign-in lifecycle for one Mastodon account:
//! it registers the app with an instance, hands out the authorize URL,
//! exchanges the redirect's code for a token and persists everything through
//! a [`chica_common::auth::CredentialStore`].

pub mod domain;
pub mod service;

use chica_common::deeplink::{Deeplink, DeeplinkError};
use chica_domain::{ChicaError, Config, OAuthAppConfig, PolicyConfig};
use thiserror::Error;

pub use domain::normalize_domain;
pub use service::SessionMachine;

/// Settings the session machine reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub oauth: OAuthAppConfig,
    pub policy: PolicyConfig,
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self { oauth: config.oauth.clone(), policy: config.policy.clone() }
    }
}

/// Why an inbound redirect URI could not complete the flow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectError {
    #[error(transparent)]
    Deeplink(#[from] DeeplinkError),

    #[error("Deep link is not an OAuth redirect: {0:?}")]
    NotAnAuthorizationCode(Deeplink),
}

impl From<RedirectError> for ChicaError {
    fn from(err: RedirectError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
