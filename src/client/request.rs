//! Outgoing request descriptor.

use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::traits::Method;

/// One API call: method, path relative to the base URL, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub(crate) retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a serializable value as the JSON body.
    pub fn with_json<T: Serialize>(self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Validation {
            field: "body",
            message: e.to_string(),
        })?;
        Ok(self.with_body(value))
    }

    /// Whether this request is a replay after a session refresh. A replay
    /// is never refreshed again.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn body_string(&self) -> Option<String> {
        self.body.as_ref().map(|b| b.to_string())
    }
}
