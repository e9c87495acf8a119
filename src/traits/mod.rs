//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport (send with any method)
//! - [`CredentialStore`] - Access/renewal credential slots
//! - [`LoginRedirect`] - Unrecoverable-session side effect

pub mod credentials;
pub mod http;
pub mod redirect;

pub use credentials::{CredentialSlot, CredentialStore, CredentialsError};
pub use http::{Headers, HttpClient, HttpError, Method, Response};
pub use redirect::LoginRedirect;
