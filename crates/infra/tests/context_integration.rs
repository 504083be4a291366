//! End-to-end sign-in over real HTTP against a wiremock instance
//!
//! The context is built with an in-memory credential store so the platform
//! keychain is never touched.

use std::sync::Arc;

use chica_common::testing::InMemoryCredentialStore;
use chica_core::dispatch::VerifyCredentials;
use chica_core::FetchError;
use chica_domain::{Config, CredentialKey, OAuthAppConfig, SessionState};
use chica_infra::{ClientContext, HttpClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `host:port` of the mock server, usable as an instance domain
fn instance_of(server: &MockServer) -> String {
    server.address().to_string()
}

fn plain_http_config() -> Config {
    Config {
        oauth: OAuthAppConfig { instance_scheme: "http".into(), ..OAuthAppConfig::default() },
        ..Config::default()
    }
}

async fn context(store: &InMemoryCredentialStore) -> ClientContext {
    let transport = Arc::new(HttpClient::builder().no_proxy().build().expect("http client"));
    ClientContext::new_with_parts(plain_http_config(), Arc::new(store.clone()), transport)
        .await
        .expect("context")
}

async fn mount_mastodon(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/apps"))
        .and(query_param("client_name", "Starlight"))
        .and(query_param("redirect_uris", "starlight://oauth"))
        .and(query_param("scopes", "read write follow push"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "563419",
            "name": "Starlight",
            "website": null,
            "redirect_uri": "starlight://oauth",
            "client_id": "abc",
            "client_secret": "xyz"
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("grant_type", "authorization_code"))
        .and(query_param("code", "ligma"))
        .and(query_param("client_id", "abc"))
        .and(query_param("client_secret", "xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "d076cc9f",
            "token_type": "Bearer",
            "scope": "read write follow push",
            "created_at": 1_573_979_017
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/verify_credentials"))
        .and(header("Authorization", "Bearer d076cc9f"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "username": "admin",
            "acct": "admin"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/revoke"))
        .and(query_param("token", "d076cc9f"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

/// Register, redirect, exchange, call, sign out
#[tokio::test]
async fn full_sign_in_round_trip() {
    let server = MockServer::start().await;
    mount_mastodon(&server).await;
    let instance = instance_of(&server);
    let store = InMemoryCredentialStore::new();
    let ctx = context(&store).await;

    assert_eq!(ctx.session.state(), SessionState::SignedOut);

    let state = ctx.session.start_flow(instance.as_str()).await;
    let SessionState::AwaitingRedirect { authorize_url, .. } = state else {
        panic!("expected AwaitingRedirect, got {state:?}");
    };
    let expected_prefix = format!("http://{instance}/oauth/authorize?client_id=abc&");
    assert!(authorize_url.starts_with(&expected_prefix));

    let state =
        ctx.session.handle_redirect("starlight://oauth?code=ligma").await.expect("redirect");
    assert_eq!(state, SessionState::Authenticated { token: "d076cc9f".into() });
    assert_eq!(store.value(CredentialKey::AccessToken).as_deref(), Some("d076cc9f"));

    let account = ctx.dispatcher.fetch(&VerifyCredentials).await.expect("account");
    assert_eq!(account.acct, "admin");

    assert_eq!(ctx.session.sign_out().await, SessionState::SignedOut);
    assert!(store.is_empty());

    let requests = server.received_requests().await.expect("request recording");
    assert!(requests.iter().any(|r| r.url.path() == "/oauth/revoke"));
}

/// A restart over the same store comes back authenticated
#[tokio::test]
async fn restored_context_is_authenticated() {
    let server = MockServer::start().await;
    mount_mastodon(&server).await;
    let store = InMemoryCredentialStore::new();

    let first = context(&store).await;
    first.session.start_flow(instance_of(&server)).await;
    first.session.complete_flow("ligma").await;
    drop(first);

    let second = context(&store).await;
    assert_eq!(second.session.state(), SessionState::Authenticated { token: "d076cc9f".into() });
    assert_eq!(second.deeplinks().expected_scheme(), "starlight");
}

/// Server errors carry the raw body through to the caller
#[tokio::test]
async fn server_error_body_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(
                r#"{"error":"Validation failed: Application name can't be blank"}"#,
            ),
        )
        .mount(&server)
        .await;
    let store = InMemoryCredentialStore::new();
    let ctx = context(&store).await;

    let result: Result<serde_json::Value, FetchError> = ctx
        .dispatcher
        .send_to(
            &instance_of(&server),
            chica_domain::HttpMethod::Post,
            "/api/v1/apps",
            &[("client_name", "")],
        )
        .await;

    let Err(FetchError::Message { status, reason, body }) = result else {
        panic!("expected Message, got {result:?}");
    };
    assert_eq!(status, 422);
    assert_eq!(reason, "Validation failed: Application name can't be blank");
    assert!(body.starts_with('{'));
}

/// An unreachable instance fails registration without touching the store
#[tokio::test]
async fn unreachable_instance_fails_registration() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = InMemoryCredentialStore::new();
    let ctx = context(&store).await;

    let state = ctx.session.start_flow(addr.to_string()).await;

    assert!(matches!(
        state,
        SessionState::Error(chica_domain::SessionError::RegistrationFailed(_))
    ));
    assert!(store.is_empty());
}
