//! Mastodon wire models
//!
//! Only the fields the authentication core relies on are required; everything
//! else defaults so that servers running older or forked Mastodon versions
//! still decode.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Application registered with an instance via `POST /api/v1/apps`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: String,
}

/// OAuth token issued by `POST /oauth/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    /// Seconds since the Unix epoch
    #[serde(default)]
    pub created_at: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Issue time as a timestamp, when the server reported one
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.created_at <= 0 {
            return None;
        }
        Utc.timestamp_opt(self.created_at, 0).single()
    }
}

/// Account as returned by the accounts endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub statuses_count: u64,
}

/// Error body Mastodon sends with non-2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_decodes_with_extra_fields() {
        let json = r#"{
            "id": "563419",
            "name": "Starlight",
            "website": null,
            "redirect_uri": "starlight://oauth",
            "client_id": "abc",
            "client_secret": "xyz",
            "vapid_key": "BCk-QqERU0q"
        }"#;

        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.client_id, "abc");
        assert_eq!(app.client_secret, "xyz");
        assert!(app.website.is_none());
    }

    #[test]
    fn token_defaults_type_and_timestamp() {
        let token: Token = serde_json::from_str(r#"{"access_token": "d076cc9f"}"#).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert!(token.created_at_utc().is_none());
    }

    #[test]
    fn token_created_at_converts() {
        let json = r#"{
            "access_token": "t",
            "token_type": "Bearer",
            "scope": "read",
            "created_at": 1573979017
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.created_at_utc().map(|dt| dt.timestamp()), Some(1_573_979_017));
    }

    #[test]
    fn account_requires_id_and_acct() {
        let result: Result<Account, _> = serde_json::from_str(r#"{"username": "admin"}"#);
        assert!(result.is_err());

        let account: Account = serde_json::from_str(r#"{"id": "1", "acct": "admin"}"#).unwrap();
        assert_eq!(account.acct, "admin");
        assert_eq!(account.followers_count, 0);
    }

    #[test]
    fn server_error_display() {
        let error = ServerError {
            error: "invalid_grant".into(),
            error_description: Some("The provided authorization grant is invalid".into()),
        };
        assert_eq!(error.to_string(), "invalid_grant: The provided authorization grant is invalid");
    }
}
