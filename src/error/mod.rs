//! Error handling for the API client.
//!
//! - [`ApiError`]: what a caller of the client sees
//! - [`RefreshError`]: why a session renewal failed, shared by every
//!   request that waited on it
//! - [`ErrorCategory`]: coarse classification for retry and messaging
//!
//! | Category | Retryable |
//! |----------|-----------|
//! | Network | Yes |
//! | Auth | No, sign in again |
//! | Server | 5xx/408/429 only |
//! | Protocol | No |
//! | Validation | No |
//! | Storage | No |

mod api_error;
mod category;
mod refresh;

pub use api_error::ApiError;
pub use category::ErrorCategory;
pub use refresh::RefreshError;

/// Result alias for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;
