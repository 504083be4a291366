//! # Chica Core
//!
//! Authentication and request logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The OAuth session state machine
//! - The request dispatcher and typed Mastodon endpoints
//! - The `Transport` port the network adapter implements
//!
//! ## Architecture Principles
//! - Depends only on `chica-common` and `chica-domain`
//! - No HTTP client or platform code
//! - External effects go through traits (`Transport`, `CredentialStore`)

pub mod dispatch;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use dispatch::{
    Dispatcher, DispatcherConfig, Endpoint, FetchError, HttpRequest, HttpResponse, Response,
    Transport, TransportError,
};
pub use session::{normalize_domain, RedirectError, SessionConfig, SessionMachine};
