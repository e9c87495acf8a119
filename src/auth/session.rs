//! Sign-in, registration and sign-out.

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::traits::{CredentialSlot, CredentialStore, HttpClient};

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Anything else the service returns (user info, messages).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub password: String,
}

impl<H, S> ApiClient<H, S>
where
    H: HttpClient,
    S: CredentialStore,
{
    /// Sign in and store the returned credentials.
    ///
    /// A success response without an `access_token` stores nothing.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = ApiRequest::post("/login").with_json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response: LoginResponse = self.request_json(request).await?;

        if let Some(access) = response.access_token.as_deref() {
            self.store().set(CredentialSlot::Access, access).await?;
            if let Some(renewal) = response.refresh_token.as_deref() {
                self.store().set(CredentialSlot::Renewal, renewal).await?;
            }
            tracing::info!("Signed in as {}", email);
        } else {
            tracing::warn!("Login response carried no access token");
        }

        Ok(response)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, user: &RegisterRequest) -> ApiResult<serde_json::Value> {
        let request = ApiRequest::post("/users/register").with_json(user)?;
        self.request_json(request).await
    }

    /// Forget both credentials.
    pub async fn logout(&self) -> ApiResult<()> {
        self.store().clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Whether an access credential is stored. Says nothing about whether
    /// the service still accepts it.
    pub async fn is_authenticated(&self) -> ApiResult<bool> {
        Ok(self.store().get(CredentialSlot::Access).await?.is_some())
    }
}
