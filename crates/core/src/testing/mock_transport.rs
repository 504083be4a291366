//! Fixture-backed transport for tests
//!
//! Routes are matched on verb plus path; a `*` segment in a pattern matches
//! any single non-empty path segment. The first matching route wins.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chica_domain::constants::{
    ACCOUNTS_PATH, APPS_PATH, OAUTH_REVOKE_PATH, OAUTH_TOKEN_PATH, VERIFY_CREDENTIALS_PATH,
};
use chica_domain::HttpMethod;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Semaphore;

use crate::dispatch::{HttpRequest, HttpResponse, Transport, TransportError};

/// Client id handed out by [`MockTransport::mastodon`]
pub const MOCK_CLIENT_ID: &str = "abc";
/// Client secret handed out by [`MockTransport::mastodon`]
pub const MOCK_CLIENT_SECRET: &str = "xyz";
/// Access token issued (and accepted) by [`MockTransport::mastodon`]
pub const MOCK_ACCESS_TOKEN: &str = "d076cc9f0c5b2c8b1c0a9e8f7d6c5b4a";

const INVALID_TOKEN_BODY: &str = r#"{"error":"The access token is invalid"}"#;

const VAPID_KEY: &str =
    "BCk-QqERU0q-CfYZjcuB6lnyyOYfJ2AifKqfeGIm7Z-HiTU5T9eTG5GxVA0_OH5mMlI4UkkDTpaZwozy0TzdZ2M=";

/// Canned response for one route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub status: u16,
    pub body: String,
    pub requires_auth: bool,
}

impl Fixture {
    #[must_use]
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self { status, body: body.to_string(), requires_auth: false }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), requires_auth: false }
    }

    /// Answer 401 unless the request carries an accepted bearer token
    #[must_use]
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

#[derive(Debug)]
struct Route {
    method: HttpMethod,
    pattern: String,
    fixture: Fixture,
}

impl Route {
    fn matches(&self, method: HttpMethod, path: &str) -> bool {
        if self.method != method {
            return false;
        }
        let mut expected = self.pattern.split('/');
        let mut actual = path.split('/');
        loop {
            match (expected.next(), actual.next()) {
                (None, None) => return true,
                (Some("*"), Some(segment)) if !segment.is_empty() => {}
                (Some(want), Some(got)) if want == got => {}
                _ => return false,
            }
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: Mutex<Vec<Route>>,
    accepted_tokens: Mutex<Option<HashSet<String>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

/// In-memory [`Transport`] serving fixtures
///
/// Clones share routes and the request log, so a test can hand one clone to
/// the dispatcher and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    /// Transport with no routes; every request fails as unknown
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport preloaded with the Mastodon endpoints used by sign-in
    ///
    /// | Route | Response |
    /// |---|---|
    /// | `POST /api/v1/apps` | application `abc` / `xyz` |
    /// | `POST /oauth/token` | token [`MOCK_ACCESS_TOKEN`] |
    /// | `POST /oauth/revoke` | `{}` |
    /// | `GET /api/v1/accounts/verify_credentials` | account `admin` (auth) |
    /// | `GET /api/v1/accounts/*` | account `admin` (auth) |
    #[must_use]
    pub fn mastodon() -> Self {
        let transport = Self::new();
        let account = json!({
            "id": "1",
            "username": "admin",
            "acct": "admin",
            "display_name": "Admin",
            "url": "https://hyrma.example/@admin",
            "followers_count": 12,
            "following_count": 3,
            "statuses_count": 140
        });

        transport
            .route(
                HttpMethod::Post,
                APPS_PATH,
                Fixture::json(
                    200,
                    json!({
                        "id": "563419",
                        "name": "Starlight",
                        "website": null,
                        "redirect_uri": "starlight://oauth",
                        "client_id": MOCK_CLIENT_ID,
                        "client_secret": MOCK_CLIENT_SECRET,
                        "vapid_key": VAPID_KEY
                    }),
                ),
            )
            .route(
                HttpMethod::Post,
                OAUTH_TOKEN_PATH,
                Fixture::json(
                    200,
                    json!({
                        "access_token": MOCK_ACCESS_TOKEN,
                        "token_type": "Bearer",
                        "scope": "read write follow push",
                        "created_at": 1_573_979_017
                    }),
                ),
            )
            .route(HttpMethod::Post, OAUTH_REVOKE_PATH, Fixture::json(200, json!({})))
            .route(
                HttpMethod::Get,
                VERIFY_CREDENTIALS_PATH,
                Fixture::json(200, account.clone()).requires_auth(),
            )
            .route(
                HttpMethod::Get,
                &format!("{ACCOUNTS_PATH}/*"),
                Fixture::json(200, account).requires_auth(),
            )
            .accept_token(MOCK_ACCESS_TOKEN);
        transport
    }

    /// Add a route; earlier routes take precedence
    pub fn route(&self, method: HttpMethod, pattern: &str, fixture: Fixture) -> &Self {
        self.state.routes.lock().push(Route { method, pattern: pattern.to_string(), fixture });
        self
    }

    /// Restrict auth-protected routes to the given tokens
    ///
    /// Until this is called, any bearer token is accepted.
    pub fn accept_token(&self, token: &str) -> &Self {
        self.state
            .accepted_tokens
            .lock()
            .get_or_insert_with(HashSet::new)
            .insert(token.to_string());
        self
    }

    /// Number of `execute` calls, including unmapped ones
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.requests.lock().clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.requests.lock().last().cloned()
    }

    /// Number of recorded requests to `path`
    #[must_use]
    pub fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }

    /// Park every request until [`Self::release_requests`] is called
    pub fn hold_requests(&self) {
        *self.state.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_requests(&self) {
        if let Some(gate) = self.state.gate.lock().take() {
            gate.close();
        }
    }

    fn respond(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let routes = self.state.routes.lock();
        let route = routes
            .iter()
            .find(|route| route.matches(request.method, request.url.path()))
            .ok_or_else(|| TransportError::UnknownEndpoint {
                method: request.method,
                url: request.url.to_string(),
            })?;

        if route.fixture.requires_auth && !self.is_authorized(request) {
            return Ok(HttpResponse::new(401, INVALID_TOKEN_BODY));
        }
        Ok(HttpResponse::new(route.fixture.status, route.fixture.body.clone()))
    }

    fn is_authorized(&self, request: &HttpRequest) -> bool {
        let Some(token) = request.bearer_token() else {
            return false;
        };
        self.state.accepted_tokens.lock().as_ref().map_or(true, |accepted| accepted.contains(token))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state.requests.lock().push(request.clone());

        let gate = self.state.gate.lock().clone();
        if let Some(gate) = gate {
            // Resolves with an error once the gate is closed
            let _ = gate.acquire().await;
        }

        self.respond(&request)
    }
}
