//! Stored credentials for the review service.
//!
//! The bearer token and the user profile returned at login are persisted as
//! a JSON file under the config directory. The store is an explicitly owned,
//! lifecycle-scoped object: loaded once at startup, cleared on logout or on
//! a forced logout (401 from a non-auth endpoint). There is no ambient
//! global state.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::models::User;

pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Token plus the profile it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
    pub user: User,
}

/// On-disk credential storage with an in-memory snapshot.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    current: RwLock<Option<StoredCredentials>>,
}

impl CredentialStore {
    /// Open the store at `dir/credentials.json`, loading any persisted
    /// credentials. A corrupt file is discarded rather than failing startup.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(CREDENTIALS_FILE);
        let current = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<StoredCredentials>(&content) {
                Ok(creds) => Some(creds),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "discarding corrupt credentials file");
                    let _ = std::fs::remove_file(&path);
                    None
                }
            },
            Err(_) => None,
        };
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().expect("credential lock poisoned").is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .expect("credential lock poisoned")
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.current
            .read()
            .expect("credential lock poisoned")
            .as_ref()
            .map(|c| c.user.clone())
    }

    /// Persist new credentials, replacing any previous ones.
    pub fn store(&self, creds: StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(&creds).context("Failed to serialize credentials")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600));
        }
        *self.current.write().expect("credential lock poisoned") = Some(creds);
        Ok(())
    }

    /// Remove credentials from memory and disk. Idempotent.
    pub fn clear(&self) -> Result<()> {
        *self.current.write().expect("credential lock poisoned") = None;
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}
