//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileCredentialStore`] - File-based credential slots
//! - [`LogRedirect`] - Login redirect that logs through `tracing`
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses
//! - [`mock::InMemoryCredentialStore`] - In-memory credential slots
//! - [`mock::RecordingRedirect`] - Redirect recorder

pub mod file_credentials;
pub mod log_redirect;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialStore;
pub use log_redirect::LogRedirect;
pub use mock::{InMemoryCredentialStore, MockHttpClient, RecordingRedirect};
pub use reqwest_http::ReqwestHttpClient;
