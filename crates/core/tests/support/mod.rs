//! Shared test helpers for `chica-core` integration tests.
//!
//! Wires a session machine to the fixture transport and an in-memory
//! credential store so each test starts from an isolated, known state.

#![allow(dead_code)]

use std::sync::Arc;

use chica_common::testing::InMemoryCredentialStore;
use chica_core::testing::MockTransport;
use chica_core::{Dispatcher, DispatcherConfig, SessionConfig, SessionMachine};
use chica_domain::{CredentialRecord, PolicyConfig};

pub const INSTANCE: &str = "hyrma.example";

/// Everything a session test needs to drive and inspect the machine
pub struct Harness {
    pub machine: SessionMachine,
    pub transport: MockTransport,
    pub store: InMemoryCredentialStore,
}

impl Harness {
    /// Fresh machine over an empty store
    pub async fn new() -> Self {
        Self::with_store(InMemoryCredentialStore::new(), SessionConfig::default()).await
    }

    /// Machine that refuses the given instances
    pub async fn rejecting(domains: &[&str]) -> Self {
        let config = SessionConfig {
            policy: PolicyConfig {
                rejected_domains: domains.iter().map(|d| d.to_string()).collect(),
            },
            ..SessionConfig::default()
        };
        Self::with_store(InMemoryCredentialStore::new(), config).await
    }

    pub async fn with_store(store: InMemoryCredentialStore, config: SessionConfig) -> Self {
        let transport = MockTransport::mastodon();
        let machine = build_machine(&transport, &store, config).await;
        Self { machine, transport, store }
    }

    /// A second machine over the same store, as after an app restart
    pub async fn relaunch(&self) -> SessionMachine {
        build_machine(&self.transport, &self.store, SessionConfig::default()).await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        self.machine.dispatcher()
    }
}

pub async fn build_machine(
    transport: &MockTransport,
    store: &InMemoryCredentialStore,
    config: SessionConfig,
) -> SessionMachine {
    let credentials = Arc::new(store.clone());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(transport.clone()),
        credentials.clone(),
        DispatcherConfig::from(&config.oauth),
    ));
    SessionMachine::restore(dispatcher, credentials, config)
        .await
        .expect("in-memory store never fails reads")
}

/// Store left behind by a completed sign-in
pub fn signed_in_record(token: &str) -> CredentialRecord {
    CredentialRecord {
        client_id: Some("abc".into()),
        client_secret: Some("xyz".into()),
        instance_domain: Some(INSTANCE.into()),
        access_token: Some(token.into()),
    }
}
