//! Error categories for handling decisions.

use std::fmt;

/// High-level classification of API client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (connect, timeout). Usually transient.
    Network,
    /// The session is missing or could not be renewed; sign in again.
    Auth,
    /// The service answered with an error status.
    Server,
    /// The service answered 2xx with a body we can't use.
    Protocol,
    /// The request was rejected locally before sending.
    Validation,
    /// The local credential store failed.
    Storage,
}

impl ErrorCategory {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Storage => "storage",
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the planner service is reachable and try again",
            ErrorCategory::Auth => "Run `tripkit login` to start a new session",
            ErrorCategory::Server => "The service reported an error; try again later",
            ErrorCategory::Protocol => "The service sent an unexpected response; try again later",
            ErrorCategory::Validation => "Fix the highlighted input and try again",
            ErrorCategory::Storage => "Check permissions on the credentials file",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
