//! Dispatcher behaviour against the fixture transport

mod support;

use chica_common::testing::InMemoryCredentialStore;
use chica_core::dispatch::{GetAccount, VerifyCredentials};
use chica_core::testing::MOCK_ACCESS_TOKEN;
use chica_core::{FetchError, SessionConfig};
use chica_domain::{Account, CredentialKey, CredentialRecord, HttpMethod};
use support::{signed_in_record, Harness, INSTANCE};

const NO_PARAMS: &[(&str, &str)] = &[];

/// Protected endpoint without a token yields the server's unauthorized reason
#[tokio::test]
async fn protected_endpoint_without_token_is_unauthorized() {
    let store = InMemoryCredentialStore::with_record(&CredentialRecord {
        instance_domain: Some(INSTANCE.into()),
        ..Default::default()
    });
    let h = Harness::with_store(store, SessionConfig::default()).await;

    let result: Result<Account, FetchError> =
        h.dispatcher().send(HttpMethod::Get, "/api/v1/accounts/1", NO_PARAMS).await;

    let Err(FetchError::Message { status, reason, body }) = result else {
        panic!("expected Message, got {result:?}");
    };
    assert_eq!(status, 401);
    assert_eq!(reason, "The access token is invalid");
    assert!(body.contains("The access token is invalid"));
}

/// A valid stored token unlocks the protected endpoint
#[tokio::test]
async fn protected_endpoint_with_token_decodes_account() {
    let store = InMemoryCredentialStore::with_record(&signed_in_record(MOCK_ACCESS_TOKEN));
    let h = Harness::with_store(store, SessionConfig::default()).await;

    let account: Account =
        h.dispatcher().send(HttpMethod::Get, "/api/v1/accounts/1", NO_PARAMS).await.unwrap();

    assert_eq!(account.id, "1");
    assert_eq!(account.acct, "admin");
    assert_eq!(h.transport.last_request().unwrap().bearer_token(), Some(MOCK_ACCESS_TOKEN));
}

/// A token the server does not recognise is refused the same way
#[tokio::test]
async fn stale_token_is_unauthorized() {
    let store = InMemoryCredentialStore::with_record(&signed_in_record("revoked-elsewhere"));
    let h = Harness::with_store(store, SessionConfig::default()).await;

    let err = h.dispatcher().fetch(&VerifyCredentials).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "The access token is invalid (HTTP 401)");
}

/// Typed endpoints go through the same pipeline as raw sends
#[tokio::test]
async fn typed_endpoints_after_sign_in() {
    let h = Harness::new().await;
    h.machine.start_flow(INSTANCE).await;
    h.machine.complete_flow("ligma").await;

    let me = h.dispatcher().fetch(&VerifyCredentials).await.unwrap();
    let other = h.dispatcher().fetch(&GetAccount::new("1")).await.unwrap();

    assert_eq!(me, other);
    assert_eq!(h.store.value(CredentialKey::InstanceDomain).as_deref(), Some(INSTANCE));
}

/// After sign-out the dispatcher no longer knows where to send requests
#[tokio::test]
async fn sign_out_forgets_instance() {
    let store = InMemoryCredentialStore::with_record(&signed_in_record(MOCK_ACCESS_TOKEN));
    let h = Harness::with_store(store, SessionConfig::default()).await;
    h.machine.sign_out().await;

    let err = h.dispatcher().fetch(&VerifyCredentials).await.unwrap_err();

    assert_eq!(err, FetchError::MissingInstance);
}
