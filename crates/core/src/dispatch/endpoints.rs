//! Typed Mastodon endpoints
//!
//! Each endpoint knows its verb, its instance-relative path, its parameters
//! and what the success body decodes into. Parameters travel in the query
//! string, which Mastodon accepts for every form-encoded call used here.

use chica_domain::constants::{
    ACCOUNTS_PATH, APPS_PATH, GRANT_TYPE_AUTHORIZATION_CODE, OAUTH_REVOKE_PATH, OAUTH_TOKEN_PATH,
    VERIFY_CREDENTIALS_PATH,
};
use chica_domain::{Account, Application, HttpMethod, OAuthAppConfig, Token};
use serde::de::DeserializeOwned;

/// A request the dispatcher can send and decode
pub trait Endpoint: Send + Sync {
    type Output: DeserializeOwned + Send;

    fn method(&self) -> HttpMethod;

    /// Path relative to the instance root, starting with `/`
    fn path(&self) -> String;

    fn params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// `POST /api/v1/apps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterApplication {
    pub client_name: String,
    pub redirect_uri: String,
    pub scopes: String,
    pub website: String,
}

impl From<&OAuthAppConfig> for RegisterApplication {
    fn from(config: &OAuthAppConfig) -> Self {
        Self {
            client_name: config.client_name.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scope_string(),
            website: config.website.clone(),
        }
    }
}

impl Endpoint for RegisterApplication {
    type Output = Application;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        APPS_PATH.to_string()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_name", self.client_name.clone()),
            ("redirect_uris", self.redirect_uri.clone()),
            ("scopes", self.scopes.clone()),
            ("website", self.website.clone()),
        ]
    }
}

/// `POST /oauth/token` with the authorization-code grant
#[derive(Clone)]
pub struct ObtainToken {
    pub client_id: String,
    pub client_secret: String,
    pub code: String,
    pub redirect_uri: String,
    pub scopes: String,
}

impl ObtainToken {
    /// Exchange `code` using the application registered for this flow
    pub fn new(
        application: &Application,
        code: impl Into<String>,
        config: &OAuthAppConfig,
    ) -> Self {
        Self {
            client_id: application.client_id.clone(),
            client_secret: application.client_secret.clone(),
            code: code.into(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scope_string(),
        }
    }
}

impl Endpoint for ObtainToken {
    type Output = Token;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        OAUTH_TOKEN_PATH.to_string()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE.to_string()),
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("redirect_uri", self.redirect_uri.clone()),
            ("scope", self.scopes.clone()),
            ("code", self.code.clone()),
        ]
    }
}

/// `POST /oauth/revoke`
#[derive(Clone)]
pub struct RevokeToken {
    pub client_id: String,
    pub client_secret: String,
    pub token: String,
}

impl Endpoint for RevokeToken {
    /// Mastodon answers with an empty JSON object
    type Output = serde_json::Value;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        OAUTH_REVOKE_PATH.to_string()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("token", self.token.clone()),
        ]
    }
}

/// `GET /api/v1/accounts/verify_credentials`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyCredentials;

impl Endpoint for VerifyCredentials {
    type Output = Account;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        VERIFY_CREDENTIALS_PATH.to_string()
    }
}

/// `GET /api/v1/accounts/:id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccount {
    pub id: String,
}

impl GetAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Endpoint for GetAccount {
    type Output = Account;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        format!("{ACCOUNTS_PATH}/{}", self.id)
    }
}
