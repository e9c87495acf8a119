//! Planner service endpoints, as methods on [`ApiClient`](crate::client::ApiClient).

pub mod models;
mod planner;
mod users;

pub use models::{
    Activity, DayPlan, Itinerary, PlanRequest, SuggestionRequest, TravelPlan,
    UpdateProfileRequest, UserProfile,
};
