//! tripkit - API client for the trip planner service.
//!
//! Requests carry the stored access credential. When the service reports it
//! expired, one renewal runs while every other failing request waits for its
//! result; then each is replayed once.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod refresh;
pub mod traits;
