//! Session renewal failures.
//!
//! A single renewal failure is delivered to every request waiting on the
//! same refresh, so the type is `Clone`.

use thiserror::Error;

use crate::traits::{CredentialsError, HttpError};

/// Why a session could not be renewed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefreshError {
    /// No renewal credential is stored.
    #[error("No refresh token available")]
    MissingRenewalCredential,

    /// The renewal endpoint answered with a non-success status.
    #[error("Refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The renewal endpoint answered 2xx without a usable access credential.
    #[error("Failed to refresh token: {message}")]
    MalformedResponse { message: String },

    /// The renewal call never got a response.
    #[error("Refresh request failed: {0}")]
    Transport(HttpError),

    /// Reading or persisting credentials failed.
    #[error("Credential store failed during refresh: {0}")]
    Store(CredentialsError),

    /// The request that owned the refresh was dropped before it settled.
    /// Waiting requests rejoin on this, so callers never receive it.
    #[error("Refresh abandoned before completion")]
    Abandoned,

    /// The 401 was not a credential-expiry response, or the request was
    /// already replayed once; no refresh was attempted.
    #[error("Session is no longer valid")]
    NotExpired,
}

impl RefreshError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RefreshError::MissingRenewalCredential => "REFRESH_NO_TOKEN",
            RefreshError::Rejected { .. } => "REFRESH_REJECTED",
            RefreshError::MalformedResponse { .. } => "REFRESH_MALFORMED",
            RefreshError::Transport(_) => "REFRESH_TRANSPORT",
            RefreshError::Store(_) => "REFRESH_STORE",
            RefreshError::Abandoned => "REFRESH_ABANDONED",
            RefreshError::NotExpired => "SESSION_INVALID",
        }
    }
}

impl From<HttpError> for RefreshError {
    fn from(err: HttpError) -> Self {
        RefreshError::Transport(err)
    }
}

impl From<CredentialsError> for RefreshError {
    fn from(err: CredentialsError) -> Self {
        RefreshError::Store(err)
    }
}
