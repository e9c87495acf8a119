//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - Scripted HTTP responses, gates, request recording
//! - [`InMemoryCredentialStore`] - In-memory credential slots
//! - [`RecordingRedirect`] - Counts login redirects

pub mod credentials;
pub mod http;
pub mod redirect;

pub use credentials::InMemoryCredentialStore;
pub use http::{MockGate, MockHttpClient, MockResponse, RecordedRequest};
pub use redirect::RecordingRedirect;
