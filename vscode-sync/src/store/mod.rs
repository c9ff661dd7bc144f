//! Secret store backends.
//!
//! A packed settings document travels as the value of one named secret. The
//! [`SecretStore`] trait is the only thing the sync layer needs; backends
//! decide where the value lives:
//!
//! - [`FileSecretStore`] - one JSON file per secret on the local disk
//! - [`KeyVaultStore`] - Azure Key Vault over its REST API
//! - [`MemorySecretStore`] - in-process map for tests

mod error;
mod file;
mod keyvault;
mod memory;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

pub use error::{StoreError, StoreResult};
pub use file::FileSecretStore;
pub use keyvault::{
    HttpResponse, HttpTransport, KeyVaultStore, ReqwestTransport, KEYVAULT_API_VERSION,
    TOKEN_ENV_VAR,
};
pub use memory::MemorySecretStore;

/// Tags attached to a stored secret.
pub type SecretTags = BTreeMap<String, String>;

/// Tag key carrying the settings group.
pub const GROUP_TAG: &str = "group";

/// Storage for named secret values.
pub trait SecretStore {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Create or replace the secret `name`.
    fn put(&self, name: &str, value: &str, tags: &SecretTags) -> StoreResult<()>;

    /// Read the current value of the secret `name`.
    fn get(&self, name: &str) -> StoreResult<String>;
}

/// Tags for a secret belonging to `group`.
pub fn group_tags(group: &str) -> SecretTags {
    let mut tags = SecretTags::new();
    tags.insert(GROUP_TAG.to_string(), group.to_string());
    tags
}

fn secret_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-Za-z-]{1,127}$").expect("valid secret name regex"))
}

/// Check a secret name against the Key Vault naming rule, which every
/// backend applies so that names stay portable between them.
pub fn validate_secret_name(name: &str) -> StoreResult<()> {
    if secret_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "use 1-127 letters, digits and dashes".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_secret_names() {
        let longest = "x".repeat(127);
        for name in ["project-vscode-settings", "a", "ABC-123", longest.as_str()] {
            assert!(validate_secret_name(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_secret_names() {
        let too_long = "x".repeat(128);
        for name in [
            "",
            "my_project",
            "dot.name",
            "space name",
            "../escape",
            too_long.as_str(),
        ] {
            assert!(
                matches!(
                    validate_secret_name(name),
                    Err(StoreError::InvalidName { .. })
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_group_tags() {
        let tags = group_tags("laptops");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["group"], "laptops");
    }
}
