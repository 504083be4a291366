//! Credential keys and the record they make up

use std::fmt;

use serde::{Deserialize, Serialize};

/// One named entry in the credential store
///
/// Each key maps to a single plain-string secure-store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKey {
    ClientId,
    ClientSecret,
    InstanceDomain,
    AccessToken,
}

impl CredentialKey {
    /// Every key, in the order they are written during an authorization flow
    pub const ALL: [Self; 4] =
        [Self::ClientId, Self::ClientSecret, Self::InstanceDomain, Self::AccessToken];

    /// Storage key used for the secure-store entry
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
            Self::InstanceDomain => "instance_domain",
            Self::AccessToken => "access_token",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything the credential store holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub instance_domain: Option<String>,
    pub access_token: Option<String>,
}

impl CredentialRecord {
    /// Mutable slot for a key
    pub fn slot_mut(&mut self, key: CredentialKey) -> &mut Option<String> {
        match key {
            CredentialKey::ClientId => &mut self.client_id,
            CredentialKey::ClientSecret => &mut self.client_secret,
            CredentialKey::InstanceDomain => &mut self.instance_domain,
            CredentialKey::AccessToken => &mut self.access_token,
        }
    }

    /// Access token, ignoring empty values left behind by older stores
    #[must_use]
    pub fn usable_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.client_secret.is_none()
            && self.instance_domain.is_none()
            && self.access_token.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_distinct() {
        let mut names: Vec<_> = CredentialKey::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn empty_token_is_not_usable() {
        let record = CredentialRecord { access_token: Some(String::new()), ..Default::default() };
        assert!(record.usable_token().is_none());
        assert!(!record.is_empty());
    }

    #[test]
    fn slot_mut_writes_the_matching_field() {
        let mut record = CredentialRecord::default();
        *record.slot_mut(CredentialKey::InstanceDomain) = Some("hyrma.example".into());
        assert_eq!(record.instance_domain.as_deref(), Some("hyrma.example"));
    }
}
