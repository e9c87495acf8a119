//! In-memory credential store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::auth::credentials::Credentials;
use crate::traits::{CredentialSlot, CredentialStore, CredentialsError};

/// In-memory credential store.
///
/// Clones share state, so a test can keep a handle and inspect what the
/// client wrote.
///
/// # Example
///
/// ```ignore
/// use tripkit::adapters::mock::InMemoryCredentialStore;
///
/// let store = InMemoryCredentialStore::with_tokens("old-access", Some("renewal"));
/// store.set(CredentialSlot::Access, "new-access").await?;
/// assert_eq!(store.access(), Some("new-access".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    credentials: Arc<Mutex<Credentials>>,
    get_should_fail: Arc<Mutex<bool>>,
    set_should_fail: Arc<Mutex<bool>>,
    remove_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with an access and optional renewal credential.
    pub fn with_tokens(access: &str, renewal: Option<&str>) -> Self {
        let store = Self::new();
        *store.credentials.lock().unwrap() = Credentials {
            access: Some(access.to_string()),
            renewal: renewal.map(str::to_string),
        };
        store
    }

    pub fn set_get_should_fail(&self, should_fail: bool) {
        *self.get_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_set_should_fail(&self, should_fail: bool) {
        *self.set_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_remove_should_fail(&self, should_fail: bool) {
        *self.remove_should_fail.lock().unwrap() = should_fail;
    }

    /// Current access credential (synchronous, for assertions).
    pub fn access(&self) -> Option<String> {
        self.credentials.lock().unwrap().access.clone()
    }

    /// Current renewal credential (synchronous, for assertions).
    pub fn renewal(&self) -> Option<String> {
        self.credentials.lock().unwrap().renewal.clone()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, slot: CredentialSlot) -> Result<Option<String>, CredentialsError> {
        if *self.get_should_fail.lock().unwrap() {
            return Err(CredentialsError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.credentials.lock().unwrap().slot(slot).map(str::to_string))
    }

    async fn set(&self, slot: CredentialSlot, value: &str) -> Result<(), CredentialsError> {
        if *self.set_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("Mock save failure".to_string()));
        }
        self.credentials
            .lock()
            .unwrap()
            .set_slot(slot, Some(value.to_string()));
        Ok(())
    }

    async fn remove(&self, slot: CredentialSlot) -> Result<(), CredentialsError> {
        if *self.remove_should_fail.lock().unwrap() {
            return Err(CredentialsError::ClearFailed("Mock clear failure".to_string()));
        }
        self.credentials.lock().unwrap().set_slot(slot, None);
        Ok(())
    }
}
