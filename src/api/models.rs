//! Request and response bodies for the planner endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Shortest trip the planner accepts, in days.
pub const MIN_TRIP_DAYS: u32 = 1;
/// Longest trip the planner accepts, in days.
pub const MAX_TRIP_DAYS: u32 = 30;

/// Body of `POST /ai/plan`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRequest {
    pub destination: String,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl PlanRequest {
    pub fn new(destination: impl Into<String>, duration: u32) -> Self {
        Self {
            destination: destination.into(),
            duration,
            interests: None,
            start_date: None,
            preferences: None,
            budget: None,
        }
    }

    /// Trip covering `start..=end`; both days count.
    pub fn for_dates(destination: impl Into<String>, start: NaiveDate, end: NaiveDate) -> ApiResult<Self> {
        let days = (end - start).num_days() + 1;
        if days < 1 {
            return Err(ApiError::Validation {
                field: "end_date",
                message: "End date must not be before the start date".to_string(),
            });
        }
        let duration = u32::try_from(days).map_err(|_| ApiError::Validation {
            field: "duration",
            message: format!("Maximum duration is {} days", MAX_TRIP_DAYS),
        })?;

        let mut request = Self::new(destination, duration);
        request.start_date = Some(start);
        Ok(request)
    }

    pub fn with_interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = Some(interests.into());
        self
    }

    pub fn with_preferences(mut self, preferences: Vec<String>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Reject what the service would reject, before sending.
    pub fn validate(&self) -> ApiResult<()> {
        if self.destination.trim().is_empty() {
            return Err(ApiError::Validation {
                field: "destination",
                message: "Destination is required".to_string(),
            });
        }
        if self.duration < MIN_TRIP_DAYS {
            return Err(ApiError::Validation {
                field: "duration",
                message: format!("Minimum duration is {} day", MIN_TRIP_DAYS),
            });
        }
        if self.duration > MAX_TRIP_DAYS {
            return Err(ApiError::Validation {
                field: "duration",
                message: format!("Maximum duration is {} days", MAX_TRIP_DAYS),
            });
        }
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(ApiError::Validation {
                    field: "budget",
                    message: "Budget must be a non-negative amount".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// One scheduled activity within a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub time: String,
    pub location: String,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    #[serde(default)]
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Response from `POST /ai/plan`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelPlan {
    pub destination: String,
    pub duration: u32,
    pub plan: Itinerary,
}

/// Body of `POST /ai/suggestions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionRequest {
    pub destination: String,
    pub query: String,
}

/// Body of `PUT /users/profile`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if self.new_password.is_some() && self.current_password.is_none() {
            return Err(ApiError::Validation {
                field: "currentPassword",
                message: "Current password is required to set a new one".to_string(),
            });
        }
        Ok(())
    }
}

/// Response from `GET /users/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
