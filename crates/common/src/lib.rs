//! Modular common utilities shared across Chica crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: deep-link parsing
//! - `platform`: secure credential storage (keychain, credential store)
//! - `observability`: tracing (pulled in by `platform`)
//! - `test-utils`: in-memory doubles for the platform traits

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod deeplink;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "platform")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{CredentialStore, KeychainCredentialStore};
#[cfg(feature = "foundation")]
pub use deeplink::{Deeplink, DeeplinkError, DeeplinkKind, DeeplinkParser};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider, SecretBackend};
