//! In-memory secret store.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::error::{StoreError, StoreResult};
use super::{validate_secret_name, SecretStore, SecretTags};

/// Keeps secrets in a process-local map. Nothing outlives the value.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, (String, SecretTags)>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags stored with `name`, if present.
    pub fn tags(&self, name: &str) -> Option<SecretTags> {
        self.secrets.lock().get(name).map(|(_, tags)| tags.clone())
    }

    pub fn len(&self) -> usize {
        self.secrets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.lock().is_empty()
    }
}

impl SecretStore for MemorySecretStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn put(&self, name: &str, value: &str, tags: &SecretTags) -> StoreResult<()> {
        validate_secret_name(name)?;
        self.secrets
            .lock()
            .insert(name.to_string(), (value.to_string(), tags.clone()));
        Ok(())
    }

    fn get(&self, name: &str) -> StoreResult<String> {
        validate_secret_name(name)?;
        self.secrets
            .lock()
            .get(name)
            .map(|(value, _)| value.clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
