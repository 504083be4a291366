//! Credential store layered on top of a [`SecretBackend`].
//!
//! Each [`CredentialKey`] becomes one keychain entry under the backend's
//! service name, holding a plain string with no envelope. Writes and clears
//! take an exclusive guard so a reader sharing this store never sees half of
//! a `clear()`.

use async_trait::async_trait;
use chica_domain::CredentialKey;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::auth::traits::CredentialStore;
use crate::security::{KeychainError, KeychainProvider, SecretBackend};

/// Credential store persisted through a secret backend, the platform
/// keychain by default
#[derive(Debug)]
pub struct KeychainCredentialStore<B = KeychainProvider> {
    backend: B,
    guard: RwLock<()>,
}

impl KeychainCredentialStore {
    /// Store namespaced by `service_name` (e.g. "Starlight.credentials")
    pub fn with_service(service_name: impl Into<String>) -> Self {
        Self::new(KeychainProvider::new(service_name))
    }
}

impl<B: SecretBackend> KeychainCredentialStore<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend, guard: RwLock::new(()) }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: SecretBackend> CredentialStore for KeychainCredentialStore<B> {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, KeychainError> {
        let _read = self.guard.read();
        match self.backend.get_secret(key.as_str()) {
            Ok(value) => Ok(Some(value)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }

    async fn set(&self, key: CredentialKey, value: Option<&str>) -> Result<(), KeychainError> {
        let _write = self.guard.write();
        match value {
            Some(value) => self.backend.set_secret(key.as_str(), value),
            None => self.backend.delete_secret(key.as_str()),
        }
    }

    async fn clear(&self) -> Result<(), KeychainError> {
        let _write = self.guard.write();
        debug!(service = %self.backend.service_name(), "Clearing stored credentials");

        let mut first_error = None;
        for key in CredentialKey::ALL {
            if let Err(err) = self.backend.delete_secret(key.as_str()) {
                warn!(key = %key, error = %err, "Failed to delete credential entry");
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
