//! Seam between credential stores and the secret backend they persist to

use super::KeychainError;

/// Flat string secrets addressed by key within one service namespace
///
/// Implemented by [`super::KeychainProvider`] for the OS keychain and by
/// `testing::MockKeychainProvider` for tests.
pub trait SecretBackend: Send + Sync {
    fn service_name(&self) -> &str;

    /// # Errors
    /// `KeychainError::AccessFailed` if the backend rejects the write
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// # Errors
    /// `KeychainError::NotFound` for a missing key, `AccessFailed` otherwise
    fn get_secret(&self, key: &str) -> Result<String, KeychainError>;

    /// Remove `key`; removing a missing key succeeds
    ///
    /// # Errors
    /// `KeychainError::AccessFailed` if an existing entry cannot be removed
    fn delete_secret(&self, key: &str) -> Result<(), KeychainError>;
}
