//! Session states, the events that drive them, and session error reasons

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mastodon::Application;

/// Authentication session state
///
/// Only the session state machine mutates this; everything else sees
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    SignedOut,
    Registering {
        domain: String,
    },
    AwaitingRedirect {
        domain: String,
        authorize_url: String,
        application: Application,
    },
    ExchangingToken {
        domain: String,
    },
    Authenticated {
        token: String,
    },
    Error(SessionError),
}

impl SessionState {
    /// Whether an authorization flow is between registration and token issue
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::Registering { .. } | Self::AwaitingRedirect { .. } | Self::ExchangingToken { .. }
        )
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token } => Some(token),
            _ => None,
        }
    }

    /// Stable label for logs; never includes secrets
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SignedOut => "signed_out",
            Self::Registering { .. } => "registering",
            Self::AwaitingRedirect { .. } => "awaiting_redirect",
            Self::ExchangingToken { .. } => "exchanging_token",
            Self::Authenticated { .. } => "authenticated",
            Self::Error(_) => "error",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(reason) => write!(f, "error: {reason}"),
            Self::Registering { domain }
            | Self::AwaitingRedirect { domain, .. }
            | Self::ExchangingToken { domain } => write!(f, "{} ({domain})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

/// Input to the session state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    StartFlow(String),
    RedirectReceived(String),
    SignOut,
    Reset,
}

impl AuthEvent {
    /// Stable label for logs; never includes the code or domain
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StartFlow(_) => "start_flow",
            Self::RedirectReceived(_) => "redirect_received",
            Self::SignOut => "sign_out",
            Self::Reset => "reset",
        }
    }
}

/// Why the session ended up in [`SessionState::Error`]
///
/// The `Display` output is meant for people, not logs.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SessionError {
    #[error("\"{0}\" is not a valid instance domain")]
    InvalidDomain(String),

    #[error("Signing in to {0} is not allowed")]
    Rejected(String),

    #[error("Could not register the app with the instance: {0}")]
    RegistrationFailed(String),

    #[error("A sign-in to {0} is already in progress")]
    AuthorizationInProgress(String),

    #[error("Could not obtain an access token: {0}")]
    ExchangeFailed(String),

    #[error("No sign-in is waiting for an authorization code")]
    UninitializedGate,

    #[error("Could not save credentials: {0}")]
    CredentialStorage(String),
}
