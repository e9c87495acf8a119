//! Credential store trait abstraction.
//!
//! The store holds two named slots, the short-lived access credential and
//! the longer-lived renewal credential, with cookie-like get/set/remove
//! semantics.

use async_trait::async_trait;
use std::fmt;

/// A named credential slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialSlot {
    /// Bearer credential attached to API calls.
    Access,
    /// Credential used only to obtain a new access credential.
    Renewal,
}

impl CredentialSlot {
    /// Persisted name of the slot.
    pub fn name(&self) -> &'static str {
        match self {
            CredentialSlot::Access => "token",
            CredentialSlot::Renewal => "refresh_token",
        }
    }
}

impl fmt::Display for CredentialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Credential store errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsError {
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Failed to clear credentials
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Trait for persisted credential storage.
///
/// # Example
///
/// ```ignore
/// use tripkit::traits::{CredentialSlot, CredentialStore};
///
/// async fn signed_in<S: CredentialStore>(store: &S) -> bool {
///     matches!(store.get(CredentialSlot::Access).await, Ok(Some(_)))
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a slot. `Ok(None)` means the slot is empty.
    async fn get(&self, slot: CredentialSlot) -> Result<Option<String>, CredentialsError>;

    /// Write a slot, replacing any previous value.
    async fn set(&self, slot: CredentialSlot, value: &str) -> Result<(), CredentialsError>;

    /// Empty a slot. Removing an empty slot is not an error.
    async fn remove(&self, slot: CredentialSlot) -> Result<(), CredentialsError>;

    /// Empty both slots.
    async fn clear(&self) -> Result<(), CredentialsError> {
        self.remove(CredentialSlot::Access).await?;
        self.remove(CredentialSlot::Renewal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_names() {
        assert_eq!(CredentialSlot::Access.name(), "token");
        assert_eq!(CredentialSlot::Renewal.name(), "refresh_token");
        assert_eq!(CredentialSlot::Renewal.to_string(), "refresh_token");
    }

    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::LoadFailed("read error".to_string()).to_string(),
            "Failed to load credentials: read error"
        );
        assert_eq!(
            CredentialsError::SaveFailed("write error".to_string()).to_string(),
            "Failed to save credentials: write error"
        );
        assert_eq!(
            CredentialsError::ClearFailed("delete error".to_string()).to_string(),
            "Failed to clear credentials: delete error"
        );
        assert_eq!(
            CredentialsError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
    }

    #[test]
    fn test_credentials_error_implements_error_trait() {
        let err = CredentialsError::Other("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
