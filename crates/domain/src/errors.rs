//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SessionError;

/// Main error type for Chica
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ChicaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Chica operations
pub type Result<T> = std::result::Result<T, ChicaError>;

impl From<SessionError> for ChicaError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidDomain(_) => Self::InvalidInput(err.to_string()),
            SessionError::CredentialStorage(_) => Self::Storage(err.to_string()),
            SessionError::RegistrationFailed(_) | SessionError::ExchangeFailed(_) => {
                Self::Network(err.to_string())
            }
            SessionError::Rejected(_)
            | SessionError::AuthorizationInProgress(_)
            | SessionError::UninitializedGate => Self::Auth(err.to_string()),
        }
    }
}
