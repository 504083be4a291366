//! Common data types used throughout the client

pub mod credentials;
pub mod http;
pub mod mastodon;
pub mod session;

pub use credentials::{CredentialKey, CredentialRecord};
pub use http::HttpMethod;
pub use mastodon::{Account, Application, ServerError, Token};
pub use session::{AuthEvent, SessionError, SessionState};
