//! Credential file storage.
//!
//! Credentials live in `~/.tripkit/credentials.json` as a flat object with
//! one key per slot, mirroring the cookie names the service expects.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::{CredentialSlot, CredentialsError};

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".tripkit";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Contents of the credentials file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Access credential.
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Renewal credential.
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    pub renewal: Option<String>,
}

impl Credentials {
    pub fn slot(&self, slot: CredentialSlot) -> Option<&str> {
        match slot {
            CredentialSlot::Access => self.access.as_deref(),
            CredentialSlot::Renewal => self.renewal.as_deref(),
        }
    }

    pub fn set_slot(&mut self, slot: CredentialSlot, value: Option<String>) {
        match slot {
            CredentialSlot::Access => self.access = value,
            CredentialSlot::Renewal => self.renewal = value,
        }
    }

    /// True when neither slot holds a value.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.renewal.is_none()
    }
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    /// Use the default location under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            path: home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
        })
    }

    /// Use an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load credentials.
    ///
    /// A missing file is an empty store. A file that can't be parsed is
    /// also treated as empty; the next save overwrites it.
    pub fn load(&self) -> Result<Credentials, CredentialsError> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }

        let file = File::open(&self.path)
            .map_err(|e| CredentialsError::LoadFailed(format!("{}: {}", self.path.display(), e)))?;

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(creds) => Ok(creds),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring unreadable credentials file: {}", e);
                Ok(Credentials::default())
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    ///
    /// Saving empty credentials deletes the file instead.
    pub fn save(&self, credentials: &Credentials) -> Result<(), CredentialsError> {
        if credentials.is_empty() {
            return self.delete();
        }

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CredentialsError::Io(e.to_string()))?;
            }
        }

        // Written beside the target and renamed over it, so a concurrent
        // load sees the old file or the new one, never a partial write.
        let staging = self.path.with_extension("json.tmp");
        let file =
            File::create(&staging).map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        drop(writer);

        fs::rename(&staging, &self.path).map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    /// Remove the file. A missing file is not an error.
    pub fn delete(&self) -> Result<(), CredentialsError> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path).map_err(|e| CredentialsError::ClearFailed(e.to_string()))
    }
}
