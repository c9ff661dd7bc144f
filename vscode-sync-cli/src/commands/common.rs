//! Settings resolution shared across commands.

use std::path::PathBuf;
use std::time::Duration;

use vscode_sync::config::{BackendKind, ConfigFile};
use vscode_sync::store::{FileSecretStore, KeyVaultStore, SecretStore};

use crate::cli::Cli;
use crate::error::CliError;

/// Message shown when a store operation lacks its target.
pub const MISSING_TARGET_MESSAGE: &str =
    "--vault and --group are required for --pack and --unpack operations";

/// Where a pack or unpack goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    pub backend: BackendKind,
    pub vault: String,
    pub group: String,
    pub secret: String,
}

/// Settings directory to operate on. CLI takes precedence, then config.
pub fn resolve_directory(cli: &Cli, config: &ConfigFile) -> PathBuf {
    cli.directory
        .clone()
        .unwrap_or_else(|| config.sync.directory.clone())
}

/// Backend to use. CLI takes precedence, then config.
pub fn resolve_backend(cli: &Cli, config: &ConfigFile) -> BackendKind {
    cli.backend
        .map(BackendKind::from)
        .unwrap_or(config.store.backend)
}

/// Vault and group for pack/unpack, from the CLI or config.
///
/// Fails with a usage error when either is missing.
pub fn resolve_vault_group(cli: &Cli, config: &ConfigFile) -> Result<(String, String), CliError> {
    let vault = cli.vault.clone().or_else(|| config.store.vault.clone());
    let group = cli.group.clone().or_else(|| config.store.group.clone());

    match (vault, group) {
        (Some(vault), Some(group)) if !vault.is_empty() && !group.is_empty() => Ok((vault, group)),
        _ => Err(CliError::Usage(MISSING_TARGET_MESSAGE.to_string())),
    }
}

/// Open the configured secret store for `vault`.
pub fn open_store(
    backend: BackendKind,
    vault: &str,
    config: &ConfigFile,
) -> Result<Box<dyn SecretStore>, CliError> {
    let store: Box<dyn SecretStore> = match backend {
        BackendKind::File => Box::new(FileSecretStore::new(&config.store.secrets_dir, vault)?),
        BackendKind::KeyVault => Box::new(KeyVaultStore::from_env(
            vault,
            Duration::from_secs(config.store.timeout_secs),
        )?),
    };
    tracing::debug!(backend = store.backend(), vault = %vault, "Opened secret store");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vscode-sync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = ConfigFile::default();
        config.store.vault = Some("config-vault".to_string());
        config.store.group = Some("config-group".to_string());

        let resolved = resolve_vault_group(&cli(&["--vault", "cli-vault"]), &config).unwrap();
        assert_eq!(resolved, ("cli-vault".to_string(), "config-group".to_string()));
    }

    #[test]
    fn test_missing_group_is_usage_error() {
        let err = resolve_vault_group(&cli(&["--vault", "v"]), &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.to_string(), MISSING_TARGET_MESSAGE);
    }

    #[test]
    fn test_directory_and_backend_defaults() {
        let config = ConfigFile::default();
        let args = cli(&[]);
        assert_eq!(resolve_directory(&args, &config), PathBuf::from(".vscode"));
        assert_eq!(resolve_backend(&args, &config), BackendKind::KeyVault);

        let args = cli(&["--directory", "conf", "--backend", "file"]);
        assert_eq!(resolve_directory(&args, &config), PathBuf::from("conf"));
        assert_eq!(resolve_backend(&args, &config), BackendKind::File);
    }

    #[test]
    fn test_open_file_store() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = ConfigFile::default();
        config.store.secrets_dir = temp.path().to_path_buf();

        let store = open_store(BackendKind::File, "team-vault", &config).unwrap();
        assert_eq!(store.backend(), "file");
    }
}
