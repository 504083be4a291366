//! Traits for credential storage
//!
//! These traits enable dependency injection and testing by abstracting the
//! system keychain.

use async_trait::async_trait;
use chica_domain::{CredentialKey, CredentialRecord};

use crate::security::KeychainError;

/// Key-value store for the four credential entries
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read one entry
    ///
    /// # Returns
    /// `Ok(None)` when the entry has never been written or was removed
    ///
    /// # Errors
    /// Returns error only if the backing store cannot be read
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, KeychainError>;

    /// Write one entry; `None` removes it
    ///
    /// # Errors
    /// Returns error if the backing store rejects the write
    async fn set(&self, key: CredentialKey, value: Option<&str>) -> Result<(), KeychainError>;

    /// Remove every entry
    ///
    /// Readers of the same store never observe a partially cleared record.
    ///
    /// # Errors
    /// Returns the first failure; the remaining entries are still removed
    async fn clear(&self) -> Result<(), KeychainError>;

    /// Read all four entries
    ///
    /// # Errors
    /// Returns error if any entry cannot be read
    async fn snapshot(&self) -> Result<CredentialRecord, KeychainError> {
        let mut record = CredentialRecord::default();
        for key in CredentialKey::ALL {
            *record.slot_mut(key) = self.get(key).await?;
        }
        Ok(record)
    }
}
