//! Credential storage for the authentication core
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  CredentialStore (trait) │  get / set / clear by CredentialKey
//! └────────────┬─────────────┘
//!              │
//!              ├──► KeychainCredentialStore  (platform keychain)
//!              └──► InMemoryCredentialStore  (testing, `test-utils`)
//! ```
//!
//! The store holds four plain-string entries: client id, client secret,
//! instance domain and access token. A miss is `Ok(None)`, never an error.
//!
//! # Platform Support
//!
//! - **macOS**: Keychain Services via the `keyring` crate
//! - **Windows**: Credential Manager via the `keyring` crate
//! - **Linux**: Secret Service API via the `keyring` crate

mod keychain;
pub mod traits;

pub use keychain::KeychainCredentialStore;
pub use traits::CredentialStore;
