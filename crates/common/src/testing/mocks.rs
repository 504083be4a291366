//! Mock implementations for testing

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chica_domain::{CredentialKey, CredentialRecord};
use parking_lot::Mutex;

use crate::auth::CredentialStore;
use crate::security::{KeychainError, SecretBackend};

type Entries = Arc<Mutex<HashMap<CredentialKey, String>>>;

/// In-memory credential store
///
/// Clones share the same entries, so a test can hand one clone to the code
/// under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    entries: Entries,
    writes: Arc<AtomicUsize>,
    failing_key: Arc<Mutex<Option<CredentialKey>>>,
    failing_reads: Arc<AtomicBool>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated from a record (not counted as writes)
    #[must_use]
    pub fn with_record(record: &CredentialRecord) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.lock();
            let mut record = record.clone();
            for key in CredentialKey::ALL {
                if let Some(value) = record.slot_mut(key).take() {
                    entries.insert(key, value);
                }
            }
        }
        store
    }

    /// Store holding only an access token, as left behind by a previous run
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::with_record(&CredentialRecord {
            access_token: Some(token.into()),
            ..Default::default()
        })
    }

    /// Make every write touching `key` fail until [`Self::heal`] is called
    pub fn fail_writes_for(&self, key: CredentialKey) {
        *self.failing_key.lock() = Some(key);
    }

    /// Make every `get` fail while `failing` is set
    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        *self.failing_key.lock() = None;
    }

    /// Number of successful `set`/`clear` calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Synchronous peek for assertions
    #[must_use]
    pub fn value(&self, key: CredentialKey) -> Option<String> {
        self.entries.lock().get(&key).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn check_writable(&self, key: CredentialKey) -> Result<(), KeychainError> {
        if *self.failing_key.lock() == Some(key) {
            return Err(KeychainError::AccessFailed(format!("injected failure for {key}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, KeychainError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("injected read failure for {key}")));
        }
        Ok(self.entries.lock().get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: Option<&str>) -> Result<(), KeychainError> {
        self.check_writable(key)?;
        let mut entries = self.entries.lock();
        match value {
            Some(value) => entries.insert(key, value.to_string()),
            None => entries.remove(&key),
        };
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), KeychainError> {
        let mut entries = self.entries.lock();
        let mut first_error = None;
        for key in CredentialKey::ALL {
            match self.check_writable(key) {
                Ok(()) => {
                    entries.remove(&key);
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        first_error.map_or(Ok(()), Err)
    }
}

/// In-memory [`SecretBackend`] standing in for the OS keychain
///
/// Missing keys read as `KeychainError::NotFound` and deleting them succeeds,
/// matching the platform provider.
#[derive(Debug, Clone, Default)]
pub struct MockKeychainProvider {
    service_name: String,
    secrets: Arc<Mutex<HashMap<String, String>>>,
    failing_reads: Arc<Mutex<HashSet<String>>>,
    failing_deletes: Arc<Mutex<HashSet<String>>>,
    delete_attempts: Arc<AtomicUsize>,
}

impl MockKeychainProvider {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), ..Self::default() }
    }

    /// Make reads of `key` fail with `AccessFailed`
    pub fn fail_reads_for(&self, key: &str) {
        self.failing_reads.lock().insert(key.to_string());
    }

    /// Make deletes of `key` fail with `AccessFailed`
    pub fn fail_deletes_for(&self, key: &str) {
        self.failing_deletes.lock().insert(key.to_string());
    }

    /// Number of `delete_secret` calls, failed ones included
    #[must_use]
    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }

    /// Synchronous peek for assertions
    #[must_use]
    pub fn secret(&self, key: &str) -> Option<String> {
        self.secrets.lock().get(key).cloned()
    }
}

impl SecretBackend for MockKeychainProvider {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.secrets.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        if self.failing_reads.lock().contains(key) {
            return Err(KeychainError::AccessFailed(format!("injected read failure for {key}")));
        }
        self.secrets.lock().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing_deletes.lock().contains(key) {
            return Err(KeychainError::AccessFailed(format!("injected delete failure for {key}")));
        }
        self.secrets.lock().remove(key);
        Ok(())
    }
}
