//! End-to-end tests over real HTTP: reqwest transport, file credential
//! store, and a wiremock server standing in for the planner service.

use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripkit::adapters::mock::RecordingRedirect;
use tripkit::adapters::{FileCredentialStore, ReqwestHttpClient};
use tripkit::api::PlanRequest;
use tripkit::auth::CredentialsFile;
use tripkit::client::ApiClient;
use tripkit::config::ClientConfig;
use tripkit::error::{ApiError, RefreshError};
use tripkit::traits::{CredentialSlot, CredentialStore};

struct Harness {
    server: MockServer,
    client: ApiClient<ReqwestHttpClient, FileCredentialStore>,
    redirect: RecordingRedirect,
    dir: TempDir,
}

impl Harness {
    async fn start(access: Option<&str>, renewal: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_timeout_secs(5)
            .with_credentials_path(dir.path().join("credentials.json"));

        let redirect = RecordingRedirect::new();
        let client = ApiClient::from_config(config)
            .unwrap()
            .with_redirect(Arc::new(redirect.clone()));

        if let Some(access) = access {
            client.store().set(CredentialSlot::Access, access).await.unwrap();
        }
        if let Some(renewal) = renewal {
            client.store().set(CredentialSlot::Renewal, renewal).await.unwrap();
        }

        Self {
            server,
            client,
            redirect,
            dir,
        }
    }

    fn saved(&self) -> tripkit::auth::Credentials {
        CredentialsFile::at(self.dir.path().join("credentials.json"))
            .load()
            .unwrap()
    }
}

async fn mount_expired_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("Authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has expired"})))
        .mount(server)
        .await;
}

async fn mount_fresh_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("Authorization", "Bearer new-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "email": "ann@example.com", "username": "ann"})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_profile_refreshes_and_persists_token() {
    let h = Harness::start(Some("old-token"), Some("refresh-token")).await;
    mount_expired_profile(&h.server).await;
    mount_fresh_profile(&h.server).await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .and(header("Authorization", "Bearer refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "new-token"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let profile = h.client.get_profile().await.unwrap();

    assert_eq!(profile.username.as_deref(), Some("ann"));
    let saved = h.saved();
    assert_eq!(saved.access.as_deref(), Some("new-token"));
    assert_eq!(saved.renewal.as_deref(), Some("refresh-token"));
    assert_eq!(h.redirect.count(), 0);
}

#[tokio::test]
async fn test_concurrent_requests_trigger_one_refresh() {
    let h = Harness::start(Some("old-token"), Some("refresh-token")).await;
    mount_expired_profile(&h.server).await;
    mount_fresh_profile(&h.server).await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "new-token"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let results = join_all((0..4).map(|_| h.client.get_profile())).await;

    for result in results {
        assert_eq!(result.unwrap().email.as_deref(), Some("ann@example.com"));
    }
    assert_eq!(h.client.coordinator().episodes(), 1);
}

#[tokio::test]
async fn test_rejected_refresh_clears_credentials_file() {
    let h = Harness::start(Some("old-token"), Some("revoked")).await;
    mount_expired_profile(&h.server).await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has been revoked"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client.get_profile().await.unwrap_err();

    assert_eq!(
        err,
        ApiError::SessionExpiredTerminal {
            reason: RefreshError::Rejected {
                status: 401,
                message: "Token has been revoked".to_string()
            }
        }
    );
    assert!(h.saved().is_empty());
    assert!(!h.dir.path().join("credentials.json").exists());
    assert_eq!(h.redirect.count(), 1);
}

#[tokio::test]
async fn test_login_then_plan() {
    let h = Harness::start(None, None).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"email": "ann@example.com", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "new-token", "refresh_token": "refresh-token"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai/plan"))
        .and(header("Authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "destination": "Kyoto",
            "duration": 2,
            "plan": {
                "days": [
                    {"day": 1, "activities": [{"time": "09:00", "location": "Gion", "activity": "Walk"}]},
                    {"day": 2, "activities": []}
                ],
                "summary": "Two days in Kyoto",
                "tips": []
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.login("ann@example.com", "pw").await.unwrap();
    assert!(h.client.is_authenticated().await.unwrap());

    let plan = h
        .client
        .generate_travel_plan(&PlanRequest::new("Kyoto", 2))
        .await
        .unwrap();
    assert_eq!(plan.plan.days.len(), 2);
    assert_eq!(plan.plan.days[0].activities[0].location, "Gion");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let dir = TempDir::new().unwrap();
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout_secs(2)
        .with_credentials_path(dir.path().join("credentials.json"));
    let client = ApiClient::from_config(config).unwrap();
    client
        .store()
        .set(CredentialSlot::Access, "token")
        .await
        .unwrap();

    let err = client.get_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_retryable());
}
