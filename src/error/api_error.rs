//! Errors surfaced to API client callers.

use thiserror::Error;

use super::category::ErrorCategory;
use super::refresh::RefreshError;
use crate::traits::{CredentialsError, HttpError};

/// Outcome of a failed API call, as seen by the caller.
///
/// A recoverable credential expiry never appears here: it is either
/// recovered transparently or becomes [`ApiError::SessionExpiredTerminal`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// A protected request was attempted with no access credential stored.
    #[error("Not signed in")]
    Unauthenticated,

    /// The session ended and could not be renewed.
    #[error("Session expired: {reason}")]
    SessionExpiredTerminal { reason: RefreshError },

    /// The request never got a response.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The service answered with an error status (other than a session 401).
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The credential store failed.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// A 2xx response whose body does not have the expected shape.
    #[error("{message}")]
    InvalidResponse { message: String },

    /// The request was rejected before sending.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Unauthenticated | ApiError::SessionExpiredTerminal { .. } => {
                ErrorCategory::Auth
            }
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::Server { .. } => ErrorCategory::Server,
            ApiError::Credentials(_) => ErrorCategory::Storage,
            ApiError::InvalidResponse { .. } => ErrorCategory::Protocol,
            ApiError::Validation { .. } => ErrorCategory::Validation,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(err) => !matches!(err, HttpError::InvalidUrl(_)),
            ApiError::Server { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            _ => false,
        }
    }

    /// Whether the user has to sign in again before the call can work.
    pub fn requires_reauth(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::SessionExpiredTerminal { reason } => reason.error_code(),
            ApiError::Transport(_) => "TRANSPORT",
            ApiError::Server { .. } => "SERVER",
            ApiError::Credentials(_) => "CREDENTIALS",
            ApiError::InvalidResponse { .. } => "INVALID_RESPONSE",
            ApiError::Validation { .. } => "VALIDATION",
        }
    }
}

impl From<RefreshError> for ApiError {
    fn from(reason: RefreshError) -> Self {
        ApiError::SessionExpiredTerminal { reason }
    }
}
