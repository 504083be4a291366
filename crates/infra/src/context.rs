//! Client context - dependency injection container
//!
//! Builds the credential store, transport, dispatcher and session machine
//! from one [`Config`] and hands them out as shared handles. Nothing here is
//! process-global; two contexts over different stores are fully independent.

use std::sync::Arc;

use chica_common::auth::{CredentialStore, KeychainCredentialStore};
use chica_common::deeplink::DeeplinkParser;
use chica_core::{Dispatcher, DispatcherConfig, SessionConfig, SessionMachine, Transport};
use chica_domain::{Config, Result};

use crate::http::HttpClient;

/// Everything a client needs to authenticate and talk to its instance
pub struct ClientContext {
    pub config: Config,
    pub credentials: Arc<dyn CredentialStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub session: Arc<SessionMachine>,
}

impl ClientContext {
    /// Context from the discovered configuration (env, file, or defaults)
    pub async fn new() -> Result<Self> {
        Self::new_with_config(crate::config::load()?).await
    }

    /// Context persisting to the platform keychain over real HTTP
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(KeychainCredentialStore::with_service(config.keychain.service_name.clone()));
        let transport: Arc<dyn Transport> = Arc::new(HttpClient::from_config(&config.transport)?);
        Self::new_with_parts(config, credentials, transport).await
    }

    /// Context over caller-supplied store and transport
    ///
    /// Tests use this to swap in in-memory doubles.
    pub async fn new_with_parts(
        config: Config,
        credentials: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let dispatcher = Arc::new(Dispatcher::new(
            transport,
            credentials.clone(),
            DispatcherConfig::from(&config.oauth),
        ));

        let session = SessionMachine::restore(
            dispatcher.clone(),
            credentials.clone(),
            SessionConfig::from(&config),
        )
        .await?;

        tracing::info!(
            service = %config.keychain.service_name,
            state = session.state().label(),
            "Client context ready"
        );

        Ok(Self { config, credentials, dispatcher, session: Arc::new(session) })
    }

    /// Parser for this client's redirect scheme
    #[must_use]
    pub fn deeplinks(&self) -> &DeeplinkParser {
        self.session.parser()
    }
}
