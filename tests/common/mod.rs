//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let fixture = Fixture::signed_in();
//! fixture.protect(PROFILE_URL);
//! let response = fixture.client.request(ApiRequest::get("/users/profile")).await;
//! ```

#![allow(dead_code)]

use serde_json::json;
use std::sync::Arc;

use tripkit::adapters::mock::{
    InMemoryCredentialStore, MockHttpClient, MockResponse, RecordedRequest, RecordingRedirect,
};
use tripkit::client::ApiClient;
use tripkit::config::ClientConfig;

pub const BASE_URL: &str = "http://api.test";
pub const REFRESH_URL: &str = "http://api.test/refresh";
pub const LOGIN_URL: &str = "http://api.test/login";
pub const PROFILE_URL: &str = "http://api.test/users/profile";
pub const PLAN_URL: &str = "http://api.test/ai/plan";
pub const SUGGEST_URL: &str = "http://api.test/ai/suggestions";

pub const OLD_TOKEN: &str = "expired-access-token";
pub const NEW_TOKEN: &str = "fresh-access-token";
pub const RENEWAL_TOKEN: &str = "test-refresh-token";

pub type MockApiClient = ApiClient<MockHttpClient, InMemoryCredentialStore>;

/// Client wired to mocks, plus handles for inspecting them.
pub struct Fixture {
    pub client: MockApiClient,
    pub redirect: RecordingRedirect,
}

impl Fixture {
    pub fn with_store(store: InMemoryCredentialStore) -> Self {
        let redirect = RecordingRedirect::new();
        let client = ApiClient::new(
            MockHttpClient::new(),
            store,
            ClientConfig::default().with_base_url(BASE_URL),
        )
        .with_redirect(Arc::new(redirect.clone()));
        Self { client, redirect }
    }

    /// Holding an expired access token and a valid renewal token.
    pub fn signed_in() -> Self {
        Self::with_store(InMemoryCredentialStore::with_tokens(OLD_TOKEN, Some(RENEWAL_TOKEN)))
    }

    pub fn http(&self) -> &MockHttpClient {
        self.client.http()
    }

    pub fn store(&self) -> &InMemoryCredentialStore {
        self.client.store()
    }

    /// `url` accepts only [`NEW_TOKEN`] and answers anything else with the
    /// expired-token 401.
    pub fn protect(&self, url: &str) {
        let echo = url.to_string();
        self.http().set_handler(url, move |req| match req.bearer() {
            Some(NEW_TOKEN) => MockResponse::json(200, json!({ "url": echo })),
            _ => expired(),
        });
    }

    /// The renewal endpoint accepts [`RENEWAL_TOKEN`] and issues [`NEW_TOKEN`].
    pub fn renewal_succeeds(&self) {
        self.http().set_handler(REFRESH_URL, |req| match req.bearer() {
            Some(RENEWAL_TOKEN) => MockResponse::json(200, json!({ "access_token": NEW_TOKEN })),
            _ => MockResponse::json(401, json!({ "msg": "Invalid refresh token" })),
        });
    }

    pub fn renewal_rejected(&self) {
        self.http().set_response(
            REFRESH_URL,
            MockResponse::json(401, json!({ "msg": "Refresh token has expired" })),
        );
    }

    pub fn refresh_calls(&self) -> usize {
        self.http().requests_to(REFRESH_URL).len()
    }

    /// Bearer tokens sent to `url`, in order.
    pub fn bearers_to(&self, url: &str) -> Vec<Option<String>> {
        self.http()
            .requests_to(url)
            .iter()
            .map(|r: &RecordedRequest| r.bearer().map(str::to_string))
            .collect()
    }
}

/// The service's answer to an expired access token.
pub fn expired() -> MockResponse {
    MockResponse::json(401, json!({ "msg": "Token has expired" }))
}

/// Yield until `cond` holds.
pub async fn until<F: Fn() -> bool>(cond: F) {
    while !cond() {
        tokio::task::yield_now().await;
    }
}
