//! Security primitives
//!
//! Generic secret storage on top of the platform keychain. Credential-specific
//! helpers live in [`crate::auth`].

pub mod keychain;
pub mod traits;

pub use keychain::{KeychainError, KeychainProvider};
pub use traits::SecretBackend;
