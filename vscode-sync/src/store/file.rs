//! Local file-backed secret store.
//!
//! Layout:
//!
//! ```text
//! <root>/
//! └── <vault>/
//!     ├── project-vscode-settings.json
//!     └── other-vscode-settings.json
//! ```
//!
//! Each file holds `{"value": ..., "tags": {...}, "updated_at": ..., "version": ...}`.
//! Writes go to a temporary sibling first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};
use super::{validate_secret_name, SecretStore, SecretTags};

#[derive(Debug, Serialize, Deserialize)]
struct StoredSecret {
    value: String,
    #[serde(default)]
    tags: SecretTags,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    version: String,
}

/// Stores each secret as a JSON file under `<root>/<vault>/`.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    vault_dir: PathBuf,
}

impl FileSecretStore {
    /// Open the store for `vault` under `root`. Nothing is created until the
    /// first write.
    pub fn new(root: impl Into<PathBuf>, vault: &str) -> StoreResult<Self> {
        validate_secret_name(vault).map_err(|_| StoreError::InvalidName {
            name: vault.to_string(),
            reason: "vault names use letters, digits and dashes".to_string(),
        })?;
        Ok(Self {
            vault_dir: root.into().join(vault),
        })
    }

    /// Directory holding this vault's secrets.
    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    fn secret_path(&self, name: &str) -> PathBuf {
        self.vault_dir.join(format!("{}.json", name))
    }

    /// Tags stored with `name`.
    pub fn tags(&self, name: &str) -> StoreResult<SecretTags> {
        Ok(self.read(name)?.tags)
    }

    fn read(&self, name: &str) -> StoreResult<StoredSecret> {
        validate_secret_name(name)?;
        let path = self.secret_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Parse(format!("{}: {}", path.display(), e)))
    }
}

impl SecretStore for FileSecretStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    fn put(&self, name: &str, value: &str, tags: &SecretTags) -> StoreResult<()> {
        validate_secret_name(name)?;

        fs::create_dir_all(&self.vault_dir).map_err(|e| StoreError::Io {
            path: self.vault_dir.clone(),
            source: e,
        })?;

        let record = StoredSecret {
            value: value.to_string(),
            tags: tags.clone(),
            updated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            version: crate::VERSION.to_string(),
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        let path = self.secret_path(name);
        let staging = self.vault_dir.join(format!(".{}.json.tmp", name));
        fs::write(&staging, json).map_err(|e| StoreError::Io {
            path: staging.clone(),
            source: e,
        })?;
        fs::rename(&staging, &path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Stored secret in local file");
        Ok(())
    }

    fn get(&self, name: &str) -> StoreResult<String> {
        Ok(self.read(name)?.value)
    }
}
