//! Errors surfaced by the request dispatcher

use chica_domain::{ChicaError, ServerError};
use thiserror::Error;

/// Outcome of a failed dispatch
///
/// Exactly one of these is produced per failed request; the transport's
/// own error is folded into `UnknownError` together with its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, unmapped mock route)
    #[error("Request failed: {0}")]
    UnknownError(String),

    /// Server answered with a non-success status
    #[error("{reason} (HTTP {status})")]
    Message { status: u16, reason: String, body: String },

    /// 2xx response whose body does not decode into the expected type
    #[error("Unexpected response format: {0}")]
    ParseError(String),

    /// Instance-relative request with no instance domain stored
    #[error("No instance domain is configured")]
    MissingInstance,
}

impl FetchError {
    /// Build a `Message` from a non-success status and body
    ///
    /// The reason is the server's `error` field when the body is a Mastodon
    /// error object, otherwise `HTTP <status>`.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let reason = serde_json::from_str::<ServerError>(&body)
            .ok()
            .map(|err| err.error)
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self::Message { status, reason, body }
    }

    /// HTTP status for `Message`, `None` otherwise
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Message { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Message { status: 401, .. })
    }
}

impl From<FetchError> for ChicaError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Message { status: 401 | 403, .. } => Self::Auth(err.to_string()),
            FetchError::MissingInstance => Self::Config(err.to_string()),
            _ => Self::Network(err.to_string()),
        }
    }
}

/// Result alias for dispatched requests
pub type Response<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_comes_from_server_error_field() {
        let err = FetchError::from_status(401, r#"{"error":"The access token is invalid"}"#);
        assert_eq!(
            err,
            FetchError::Message {
                status: 401,
                reason: "The access token is invalid".into(),
                body: r#"{"error":"The access token is invalid"}"#.into(),
            }
        );
        assert_eq!(err.to_string(), "The access token is invalid (HTTP 401)");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn reason_falls_back_to_status() {
        let err = FetchError::from_status(502, "<html>Bad Gateway</html>");
        assert!(matches!(&err, FetchError::Message { reason, .. } if reason == "HTTP 502"));
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn maps_into_domain_error() {
        let auth: ChicaError = FetchError::from_status(403, "{}").into();
        assert!(matches!(auth, ChicaError::Auth(_)));

        let config: ChicaError = FetchError::MissingInstance.into();
        assert!(matches!(config, ChicaError::Config(_)));

        let network: ChicaError = FetchError::UnknownError("dns".into()).into();
        assert!(matches!(network, ChicaError::Network(_)));
    }
}
