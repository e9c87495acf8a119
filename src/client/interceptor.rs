//! Response classification.
//!
//! Decides, for every response, whether it goes back to the caller, fails
//! the call, triggers a session refresh, or ends the session.

use serde::Deserialize;

use super::request::ApiRequest;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::traits::Response;

const UNAUTHORIZED: u16 = 401;

/// What to do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// 2xx: hand it to the caller.
    Deliver,
    /// Non-401 error status: fail with `ApiError::Server`.
    Fail,
    /// Expired access credential on a first attempt: refresh and replay.
    Recover,
    /// Any other 401: clear credentials and stop.
    Terminate,
}

/// Error body shapes the service uses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn error_body(response: &Response) -> ErrorBody {
    response.json().unwrap_or_default()
}

pub(crate) fn classify(config: &ClientConfig, request: &ApiRequest, response: &Response) -> Disposition {
    if response.is_success() {
        return Disposition::Deliver;
    }
    // The public allow-list only skips credential attachment; a 401 on a
    // public path ends the session like any other.
    if response.status != UNAUTHORIZED {
        return Disposition::Fail;
    }
    if !request.is_retried() && is_expiry(config, response) {
        Disposition::Recover
    } else {
        Disposition::Terminate
    }
}

/// A 401 whose `msg` names credential expiry.
pub(crate) fn is_expiry(config: &ClientConfig, response: &Response) -> bool {
    response.status == UNAUTHORIZED
        && error_body(response).msg.as_deref() == Some(config.expired_token_message.as_str())
}

/// Best human-readable message from an error response.
pub(crate) fn error_message(response: &Response) -> String {
    let body = error_body(response);
    body.msg
        .or(body.message)
        .or(body.error)
        .or_else(|| response.text().ok().filter(|t| !t.trim().is_empty()))
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

pub(crate) fn server_error(response: &Response) -> ApiError {
    ApiError::Server {
        status: response.status,
        message: error_message(response),
    }
}
