//! OAuth session state machine
//!
//! Drives `SignedOut -> Registering -> AwaitingRedirect -> ExchangingToken ->
//! Authenticated`, with `Error` reachable from any step. Events are handled
//! one at a time: each holds the event lock for its whole run, network and
//! keychain I/O included, so a second event queues behind the first and then
//! sees the state the first one left behind.

use std::sync::Arc;

use chica_common::auth::CredentialStore;
use chica_common::deeplink::{Deeplink, DeeplinkParser};
use chica_common::security::KeychainError;
use chica_domain::constants::OAUTH_AUTHORIZE_PATH;
use chica_domain::{Application, AuthEvent, CredentialKey, SessionError, SessionState};
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use super::domain::normalize_domain;
use super::{RedirectError, SessionConfig};
use crate::dispatch::{Dispatcher, FetchError, ObtainToken, RegisterApplication, RevokeToken};

type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// Authentication session for one app instance
pub struct SessionMachine {
    state: Mutex<SessionState>,
    published: watch::Sender<SessionState>,
    listeners: SyncMutex<Vec<Listener>>,
    dispatcher: Arc<Dispatcher>,
    credentials: Arc<dyn CredentialStore>,
    parser: DeeplinkParser,
    config: SessionConfig,
}

impl SessionMachine {
    /// Build the machine from whatever a previous run left in the store
    ///
    /// Starts `Authenticated` when a non-empty access token is stored,
    /// `SignedOut` otherwise. The authorize URL of an unfinished flow is
    /// not persisted, so an interrupted sign-in restarts from `SignedOut`.
    ///
    /// # Errors
    /// Returns the store's error if the token cannot be read.
    pub async fn restore(
        dispatcher: Arc<Dispatcher>,
        credentials: Arc<dyn CredentialStore>,
        config: SessionConfig,
    ) -> Result<Self, KeychainError> {
        let initial = resting_state(credentials.as_ref()).await?;
        info!(state = initial.label(), "Session restored");

        let (published, _) = watch::channel(initial.clone());
        Ok(Self {
            state: Mutex::new(initial),
            published,
            listeners: SyncMutex::new(Vec::new()),
            dispatcher,
            credentials,
            parser: DeeplinkParser::new(config.oauth.url_scheme()),
            config,
        })
    }

    /// Latest committed state
    ///
    /// Does not wait for an in-flight event, so it can report intermediate
    /// states such as `Registering`.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.published.borrow().clone()
    }

    /// Receiver that observes every committed state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.published.subscribe()
    }

    /// Register a callback run synchronously on every transition
    ///
    /// Callbacks run while the event lock is held; they must not feed events
    /// back into this machine.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Arc::new(listener));
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    #[must_use]
    pub fn parser(&self) -> &DeeplinkParser {
        &self.parser
    }

    /// Begin signing in to `domain`
    pub async fn start_flow(&self, domain: impl Into<String>) -> SessionState {
        self.handle(AuthEvent::StartFlow(domain.into())).await
    }

    /// Exchange an authorization code for an access token
    pub async fn complete_flow(&self, code: impl Into<String>) -> SessionState {
        self.handle(AuthEvent::RedirectReceived(code.into())).await
    }

    /// Parse an inbound redirect URI and complete the flow with its code
    ///
    /// # Errors
    /// `RedirectError` when the URI is malformed or is not an OAuth redirect;
    /// the session state is left untouched in that case.
    pub async fn handle_redirect(&self, uri: &str) -> Result<SessionState, RedirectError> {
        match self.parser.parse(uri)? {
            Deeplink::OAuthCode(code) => Ok(self.complete_flow(code).await),
            other => Err(RedirectError::NotAnAuthorizationCode(other)),
        }
    }

    /// Revoke (best effort), wipe stored credentials and sign out
    ///
    /// Ends in `Error(CredentialStorage)` when the store cannot be wiped;
    /// whatever it still holds is what the next launch restores.
    pub async fn sign_out(&self) -> SessionState {
        self.handle(AuthEvent::SignOut).await
    }

    /// Leave an error state, re-deriving the state from stored credentials
    ///
    /// A store that cannot be read leaves the session in
    /// `Error(CredentialStorage)`.
    pub async fn reset(&self) -> SessionState {
        self.handle(AuthEvent::Reset).await
    }

    /// Apply one event and return the resulting state
    #[instrument(skip(self, event), fields(event = event.label()))]
    pub async fn handle(&self, event: AuthEvent) -> SessionState {
        let mut state = self.state.lock().await;
        match event {
            AuthEvent::StartFlow(domain) => self.on_start_flow(&mut state, &domain).await,
            AuthEvent::RedirectReceived(code) => self.on_redirect(&mut state, code).await,
            AuthEvent::SignOut => self.on_sign_out(&mut state).await,
            AuthEvent::Reset => self.on_reset(&mut state).await,
        }
        state.clone()
    }

    async fn on_start_flow(&self, state: &mut SessionState, raw_domain: &str) {
        let domain = match normalize_domain(raw_domain) {
            Ok(domain) => domain,
            Err(err) => return self.fail(state, err),
        };

        if self.config.policy.is_rejected(&domain) {
            warn!(instance = %domain, "Sign-in refused for rejected instance");
            return self.fail(state, SessionError::Rejected(domain));
        }

        if state.is_in_progress() {
            return self.fail(state, SessionError::AuthorizationInProgress(domain));
        }

        if matches!(state, SessionState::Authenticated { .. }) {
            if let Err(err) = self.drop_session().await {
                return self.fail(state, SessionError::CredentialStorage(err.to_string()));
            }
        }

        self.commit(state, SessionState::Registering { domain: domain.clone() });

        let endpoint = RegisterApplication::from(&self.config.oauth);
        let application = match self.dispatcher.fetch_from(&domain, &endpoint).await {
            Ok(application) => application,
            Err(err) => {
                warn!(instance = %domain, error = %err, "App registration failed");
                return self.fail(state, SessionError::RegistrationFailed(err.to_string()));
            }
        };

        if let Err(err) = self.persist_registration(&domain, &application).await {
            return self.fail(state, SessionError::CredentialStorage(err.to_string()));
        }

        let authorize_url = match self.authorize_url(&domain, &application) {
            Ok(url) => url,
            Err(err) => return self.fail(state, SessionError::RegistrationFailed(err.to_string())),
        };

        info!(instance = %domain, "App registered; awaiting authorization");
        self.commit(state, SessionState::AwaitingRedirect { domain, authorize_url, application });
    }

    async fn on_redirect(&self, state: &mut SessionState, code: String) {
        let SessionState::AwaitingRedirect { domain, application, .. } = &*state else {
            debug!(state = state.label(), "Authorization code arrived with no flow waiting");
            return self.fail(state, SessionError::UninitializedGate);
        };
        let (domain, application) = (domain.clone(), application.clone());

        self.commit(state, SessionState::ExchangingToken { domain: domain.clone() });

        let endpoint = ObtainToken::new(&application, code, &self.config.oauth);
        let token = match self.dispatcher.fetch_from(&domain, &endpoint).await {
            Ok(token) if !token.access_token.is_empty() => token.access_token,
            Ok(_) => {
                let reason = "Server issued an empty token".to_string();
                return self.fail(state, SessionError::ExchangeFailed(reason));
            }
            Err(err) => {
                warn!(instance = %domain, error = %err, "Token exchange failed");
                return self.fail(state, SessionError::ExchangeFailed(err.to_string()));
            }
        };

        if let Err(err) = self.credentials.set(CredentialKey::AccessToken, Some(&token)).await {
            return self.fail(state, SessionError::CredentialStorage(err.to_string()));
        }

        info!(instance = %domain, "Signed in");
        self.commit(state, SessionState::Authenticated { token });
    }

    async fn on_sign_out(&self, state: &mut SessionState) {
        self.revoke_best_effort().await;

        // Never `SignedOut` while a token may still be stored
        if let Err(err) = self.credentials.clear().await {
            return self.fail(state, SessionError::CredentialStorage(err.to_string()));
        }

        info!("Signed out");
        self.commit(state, SessionState::SignedOut);
    }

    async fn on_reset(&self, state: &mut SessionState) {
        match resting_state(self.credentials.as_ref()).await {
            Ok(next) => self.commit(state, next),
            Err(err) => self.fail(state, SessionError::CredentialStorage(err.to_string())),
        }
    }

    /// Remove the token and instance of the current session
    ///
    /// Used when signing in to another instance while authenticated.
    async fn drop_session(&self) -> Result<(), KeychainError> {
        debug!("Replacing existing session");
        self.credentials.set(CredentialKey::AccessToken, None).await?;
        self.credentials.set(CredentialKey::InstanceDomain, None).await
    }

    async fn persist_registration(
        &self,
        domain: &str,
        application: &Application,
    ) -> Result<(), KeychainError> {
        let writes = [
            (CredentialKey::ClientId, application.client_id.as_str()),
            (CredentialKey::ClientSecret, application.client_secret.as_str()),
            (CredentialKey::InstanceDomain, domain),
        ];

        for (index, (key, value)) in writes.iter().enumerate() {
            if let Err(err) = self.credentials.set(*key, Some(*value)).await {
                warn!(key = %key, error = %err, "Failed to persist registration; rolling back");
                for (written, _) in &writes[..index] {
                    if let Err(rollback) = self.credentials.set(*written, None).await {
                        warn!(key = %written, error = %rollback, "Rollback failed");
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn authorize_url(&self, domain: &str, application: &Application) -> Result<String, FetchError> {
        let mut url = self
            .dispatcher
            .instance_base(domain)?
            .join(OAUTH_AUTHORIZE_PATH)
            .map_err(|e| FetchError::UnknownError(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("client_id", &application.client_id)
            .append_pair("redirect_uri", &self.config.oauth.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.oauth.scope_string());

        Ok(url.into())
    }

    async fn revoke_best_effort(&self) {
        let record = match self.credentials.snapshot().await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "Could not read credentials; skipping token revocation");
                return;
            }
        };

        let (Some(token), Some(client_id), Some(client_secret), Some(domain)) = (
            record.usable_token(),
            record.client_id.as_deref(),
            record.client_secret.as_deref(),
            record.instance_domain.as_deref(),
        ) else {
            debug!("Nothing to revoke");
            return;
        };

        let endpoint = RevokeToken {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token: token.to_string(),
        };
        if let Err(err) = self.dispatcher.fetch_from(domain, &endpoint).await {
            warn!(instance = %domain, error = %err, "Token revocation failed; clearing locally");
        }
    }

    fn fail(&self, state: &mut SessionState, error: SessionError) {
        warn!(reason = ?error, "Session entered error state");
        self.commit(state, SessionState::Error(error));
    }

    fn commit(&self, state: &mut SessionState, next: SessionState) {
        debug!(from = state.label(), to = next.label(), "Session transition");
        *state = next.clone();
        self.published.send_replace(next.clone());

        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener(&next);
        }
    }
}

async fn resting_state(credentials: &dyn CredentialStore) -> Result<SessionState, KeychainError> {
    Ok(match credentials.get(CredentialKey::AccessToken).await? {
        Some(token) if !token.is_empty() => SessionState::Authenticated { token },
        _ => SessionState::SignedOut,
    })
}
