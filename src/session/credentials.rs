//! Credential persistence
//!
//! One bearer token per device identity, overwritten rather than merged.
//! Callers treat absence and an empty string as equivalent: both mean
//! "no credential", and both `get` implementations normalize to `None`.

use crate::error::{MemovoxError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage for the bearer token identifying the authenticated session
pub trait CredentialStore: Send + Sync {
    /// Store the token, replacing any previous one
    fn set(&self, token: &str) -> Result<()>;

    /// Read the stored token; `None` when absent or empty
    fn get(&self) -> Result<Option<String>>;

    /// Remove the stored token; removing an absent token is not an error
    fn delete(&self) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    token: String,
}

/// Token stored as TOML under the user config directory
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at `<config dir>/memovox/credentials.toml`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| MemovoxError::Storage("no user config directory".to_string()))?;
        Ok(Self::at(dir.join("memovox").join("credentials.toml")))
    }

    /// Store at a custom path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = toml::to_string(&CredentialsFile {
            token: token.to_string(),
        })
        .map_err(|e| MemovoxError::Storage(e.to_string()))?;
        std::fs::write(&self.path, body)?;

        // Owner-only read on platforms that support it
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: CredentialsFile =
            toml::from_str(&content).map_err(|e| MemovoxError::Storage(e.to_string()))?;
        if file.token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(file.token))
        }
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, token: &str) -> Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().clone().filter(|t| !t.is_empty()))
    }

    fn delete(&self) -> Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}
