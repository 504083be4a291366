//! Application constants
//!
//! Mastodon endpoint paths and OAuth defaults shared by the client crates.

// Mastodon REST endpoints
pub const APPS_PATH: &str = "/api/v1/apps";
pub const OAUTH_AUTHORIZE_PATH: &str = "/oauth/authorize";
pub const OAUTH_TOKEN_PATH: &str = "/oauth/token";
pub const OAUTH_REVOKE_PATH: &str = "/oauth/revoke";
pub const VERIFY_CREDENTIALS_PATH: &str = "/api/v1/accounts/verify_credentials";
pub const ACCOUNTS_PATH: &str = "/api/v1/accounts";

// OAuth defaults
pub const DEFAULT_CLIENT_NAME: &str = "Starlight";
pub const DEFAULT_WEBSITE: &str = "https://github.com/chica-social/starlight";
pub const DEFAULT_REDIRECT_URI: &str = "starlight://oauth";
pub const DEFAULT_SCOPES: [&str; 4] = ["read", "write", "follow", "push"];
pub const DEFAULT_INSTANCE_SCHEME: &str = "https";
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

// Keychain
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Starlight.credentials";

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
