//! AI itinerary and travel-advice endpoints.

use super::models::{PlanRequest, SuggestionRequest, TravelPlan};
use crate::client::{ApiClient, ApiRequest};
use crate::error::{ApiError, ApiResult};
use crate::traits::{CredentialStore, HttpClient};

const INVALID_PLAN: &str = "Invalid response structure from server";

impl<H, S> ApiClient<H, S>
where
    H: HttpClient,
    S: CredentialStore,
{
    /// `POST /ai/plan`
    ///
    /// The response must name a destination and carry a plan.
    pub async fn generate_travel_plan(&self, plan: &PlanRequest) -> ApiResult<TravelPlan> {
        plan.validate()?;
        let request = ApiRequest::post("/ai/plan").with_json(plan)?;
        let body: serde_json::Value = self.request_json(request).await?;

        let has_destination = body
            .get("destination")
            .and_then(|d| d.as_str())
            .is_some_and(|d| !d.is_empty());
        let has_plan = body.get("plan").is_some_and(|p| !p.is_null());
        if !has_destination || !has_plan {
            tracing::error!("Travel plan response missing destination or plan");
            return Err(ApiError::InvalidResponse {
                message: INVALID_PLAN.to_string(),
            });
        }

        serde_json::from_value(body).map_err(|e| {
            tracing::error!("Travel plan response did not parse: {}", e);
            ApiError::InvalidResponse {
                message: INVALID_PLAN.to_string(),
            }
        })
    }

    /// `POST /ai/suggestions`
    pub async fn get_travel_suggestions(
        &self,
        suggestion: &SuggestionRequest,
    ) -> ApiResult<serde_json::Value> {
        let request = ApiRequest::post("/ai/suggestions").with_json(suggestion)?;
        self.request_json(request).await
    }
}
