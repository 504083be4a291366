//! Testing utilities
//!
//! - **[`mocks`]**: in-memory implementations of the platform traits
//!   (`InMemoryCredentialStore`, `MockKeychainProvider`)
//!
//! ```rust
//! use chica_common::testing::InMemoryCredentialStore;
//!
//! let store = InMemoryCredentialStore::new();
//! assert_eq!(store.write_count(), 0);
//! ```

pub mod mocks;

pub use mocks::{InMemoryCredentialStore, MockKeychainProvider};
