//! Authenticated API client.
//!
//! Every call goes through two hooks around the transport:
//!
//! 1. Pre-flight: protected requests get the stored access credential as a
//!    bearer header. With no credential stored the request is not sent.
//! 2. Post-flight: an expired-credential 401 is recovered through the
//!    [`TokenRefreshCoordinator`] and the request replayed once with the new
//!    credential; any other 401 ends the session.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

use super::interceptor::{self, Disposition};
use super::request::ApiRequest;
use crate::adapters::{FileCredentialStore, LogRedirect, ReqwestHttpClient};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, RefreshError};
use crate::refresh::{RefreshOutcome, TokenRefreshCoordinator};
use crate::traits::{
    CredentialSlot, CredentialStore, Headers, HttpClient, LoginRedirect, Response,
};

/// Body returned by the renewal endpoint.
#[derive(Debug, Deserialize)]
struct RenewalResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// API client with transparent session refresh.
///
/// # Example
///
/// ```ignore
/// use tripkit::client::{ApiClient, ApiRequest};
/// use tripkit::config::ClientConfig;
///
/// let client = ApiClient::from_config(ClientConfig::from_env())?;
/// let profile = client.request(ApiRequest::get("/users/profile")).await?;
/// ```
pub struct ApiClient<H, S> {
    http: H,
    store: S,
    redirect: Arc<dyn LoginRedirect>,
    config: ClientConfig,
    coordinator: TokenRefreshCoordinator,
}

impl ApiClient<ReqwestHttpClient, FileCredentialStore> {
    /// Production client: reqwest transport bounded by the configured
    /// timeout, credentials in the configured (or default) file.
    pub fn from_config(config: ClientConfig) -> ApiResult<Self> {
        let http = ReqwestHttpClient::with_timeout(config.timeout())?;
        let store = match &config.credentials_path {
            Some(path) => FileCredentialStore::at(path),
            None => FileCredentialStore::new()?,
        };
        Ok(Self::new(http, store, config))
    }
}

impl<H, S> ApiClient<H, S>
where
    H: HttpClient,
    S: CredentialStore,
{
    pub fn new(http: H, store: S, config: ClientConfig) -> Self {
        Self {
            http,
            store,
            redirect: Arc::new(LogRedirect),
            config,
            coordinator: TokenRefreshCoordinator::new(),
        }
    }

    /// Replace the login redirect side effect.
    pub fn with_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn coordinator(&self) -> &TokenRefreshCoordinator {
        &self.coordinator
    }

    /// Send a request, recovering from access-credential expiry.
    ///
    /// Non-2xx responses other than session 401s come back as
    /// [`ApiError::Server`].
    pub async fn request(&self, request: ApiRequest) -> ApiResult<Response> {
        let token = self.preflight(&request).await?;
        let response = self.send(&request, token.as_deref()).await?;

        match interceptor::classify(&self.config, &request, &response) {
            Disposition::Deliver => Ok(response),
            Disposition::Fail => Err(interceptor::server_error(&response)),
            Disposition::Recover => self.recover(request, token).await,
            Disposition::Terminate => Err(self.end_session(RefreshError::NotExpired).await),
        }
    }

    /// Send a request and decode the 2xx body.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let path = request.path.clone();
        let response = self.request(request).await?;
        response.json().map_err(|e| ApiError::InvalidResponse {
            message: format!("Unexpected response from {}: {}", path, e),
        })
    }

    /// Renew the access credential now, sharing any renewal already in
    /// flight. Failure ends the session like an unrecoverable 401.
    pub async fn refresh_now(&self) -> ApiResult<String> {
        let settlement = self.coordinator.refresh_or_wait(|| self.renew()).await;
        match settlement.outcome {
            Ok(token) => Ok(token),
            Err(reason) if settlement.led => Err(self.end_session(reason).await),
            Err(reason) => Err(ApiError::SessionExpiredTerminal { reason }),
        }
    }

    /// Attach the access credential, or refuse to send.
    async fn preflight(&self, request: &ApiRequest) -> ApiResult<Option<String>> {
        if self.config.is_public(&request.path) {
            return Ok(None);
        }

        match self.store.get(CredentialSlot::Access).await? {
            Some(token) => Ok(Some(token)),
            None => {
                tracing::warn!(path = %request.path, "No access token, redirecting to login");
                self.redirect.redirect_to_login(&self.config.login_path);
                Err(ApiError::Unauthenticated)
            }
        }
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<Response> {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            retried = request.is_retried(),
            "Sending request"
        );

        let url = self.config.url(&request.path);
        let body = request.body_string();
        let response = self
            .http
            .send(request.method, &url, body.as_deref(), &headers)
            .await?;
        Ok(response)
    }

    async fn recover(&self, request: ApiRequest, sent_with: Option<String>) -> ApiResult<Response> {
        // A refresh that settled after this request went out has already
        // replaced the credential; replay with it instead of renewing again.
        if let Some(current) = self.store.get(CredentialSlot::Access).await? {
            if sent_with.as_deref().is_some_and(|sent| sent != current) {
                return self.replay(request, current).await;
            }
        }

        let settlement = self.coordinator.refresh_or_wait(|| self.renew()).await;
        match settlement.outcome {
            Ok(token) => self.replay(request, token).await,
            // Only the leader clears credentials and redirects, once per episode.
            Err(reason) if settlement.led => Err(self.end_session(reason).await),
            Err(reason) => Err(ApiError::SessionExpiredTerminal { reason }),
        }
    }

    /// Re-issue a request once with an explicit credential.
    async fn replay(&self, mut request: ApiRequest, token: String) -> ApiResult<Response> {
        request.retried = true;
        let response = self.send(&request, Some(&token)).await?;

        match interceptor::classify(&self.config, &request, &response) {
            Disposition::Deliver => Ok(response),
            Disposition::Fail => Err(interceptor::server_error(&response)),
            Disposition::Recover | Disposition::Terminate => {
                Err(self.end_session(RefreshError::NotExpired).await)
            }
        }
    }

    /// Call the renewal endpoint and persist the result.
    async fn renew(&self) -> RefreshOutcome {
        let renewal = self
            .store
            .get(CredentialSlot::Renewal)
            .await?
            .ok_or(RefreshError::MissingRenewalCredential)?;

        tracing::info!("Access token expired, refreshing session");

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), format!("Bearer {}", renewal));

        let url = self.config.url(&self.config.refresh_path);
        let response = self.http.post(&url, "{}", &headers).await?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                message: interceptor::error_message(&response),
            });
        }

        let body: RenewalResponse =
            response
                .json()
                .map_err(|e| RefreshError::MalformedResponse {
                    message: e.to_string(),
                })?;
        let access = body
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| RefreshError::MalformedResponse {
                message: "response has no access_token".to_string(),
            })?;

        self.store.set(CredentialSlot::Access, &access).await?;
        if let Some(renewal) = body.refresh_token.filter(|token| !token.is_empty()) {
            self.store.set(CredentialSlot::Renewal, &renewal).await?;
        }

        Ok(access)
    }

    /// Clear both credentials, redirect to login, and build the caller's error.
    async fn end_session(&self, reason: RefreshError) -> ApiError {
        tracing::warn!(code = reason.error_code(), "Ending session: {}", reason);

        if let Err(err) = self.store.clear().await {
            tracing::error!("Failed to clear credentials: {}", err);
        }
        self.redirect.redirect_to_login(&self.config.login_path);

        ApiError::SessionExpiredTerminal { reason }
    }
}
