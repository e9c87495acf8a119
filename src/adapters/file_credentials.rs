//! File-based credential store adapter.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::auth::credentials::CredentialsFile;
use crate::traits::{CredentialSlot, CredentialStore, CredentialsError};

/// [`CredentialStore`] backed by [`CredentialsFile`].
///
/// Each operation is a read-modify-write of the whole file, serialized by
/// an internal lock so concurrent `set`/`remove` calls don't lose updates.
#[derive(Debug)]
pub struct FileCredentialStore {
    file: CredentialsFile,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Store at the default location (`~/.tripkit/credentials.json`).
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsFile::new()
            .map(Self::with_file)
            .ok_or_else(|| {
                CredentialsError::Other("Failed to determine home directory".to_string())
            })
    }

    /// Store at an explicit path.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self::with_file(CredentialsFile::at(path.as_ref()))
    }

    fn with_file(file: CredentialsFile) -> Self {
        Self {
            file,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn update(&self, slot: CredentialSlot, value: Option<String>) -> Result<(), CredentialsError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut creds = self.file.load()?;
        creds.set_slot(slot, value);
        self.file.save(&creds)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, slot: CredentialSlot) -> Result<Option<String>, CredentialsError> {
        let creds = self.file.load()?;
        Ok(creds.slot(slot).map(str::to_string))
    }

    async fn set(&self, slot: CredentialSlot, value: &str) -> Result<(), CredentialsError> {
        self.update(slot, Some(value.to_string()))
    }

    async fn remove(&self, slot: CredentialSlot) -> Result<(), CredentialsError> {
        self.update(slot, None)
    }
}
