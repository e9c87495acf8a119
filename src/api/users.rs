//! Profile endpoints.

use super::models::{UpdateProfileRequest, UserProfile};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::traits::{CredentialStore, HttpClient};

impl<H, S> ApiClient<H, S>
where
    H: HttpClient,
    S: CredentialStore,
{
    /// `GET /users/profile`
    pub async fn get_profile(&self) -> ApiResult<UserProfile> {
        self.request_json(ApiRequest::get("/users/profile")).await
    }

    /// `PUT /users/profile`
    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> ApiResult<serde_json::Value> {
        update.validate()?;
        let request = ApiRequest::put("/users/profile").with_json(update)?;
        self.request_json(request).await
    }
}
