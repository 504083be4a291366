//! Deep-link rejection reasons
//!
//! Variants are reported in the order the parser checks them: URI syntax,
//! scheme, host, parameter count, then the named parameter.

use thiserror::Error;

/// Reasons a deep link is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeeplinkError {
    #[error("Invalid deep link URI: {0}")]
    InvalidUri(String),

    #[error("Unknown URL scheme \"{received}\", expected \"{expected}\"")]
    UnknownScheme { expected: String, received: String },

    #[error("Unknown deep link \"{0}\"")]
    UnknownDeeplink(String),

    #[error("Expected {expecting} query parameter(s), received {received}")]
    ExpectedQueryParameters { expecting: usize, received: usize },

    #[error("Missing query parameter \"{expecting}\"")]
    UnknownQueryParameter { expecting: String },
}

impl From<DeeplinkError> for chica_domain::ChicaError {
    fn from(err: DeeplinkError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
