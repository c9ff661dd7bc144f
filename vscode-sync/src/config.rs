//! Configuration file support.
//!
//! Settings live in an INI file at `~/.vscode-sync/config.ini` (override
//! with `VSCODE_SYNC_CONFIG`). A missing file means all defaults.
//!
//! ```ini
//! [sync]
//! directory = .vscode
//!
//! [store]
//! backend = keyvault
//! vault = team-vault
//! group = laptops
//! secrets_dir = ~/.vscode-sync/secrets
//! timeout_secs = 30
//!
//! [logging]
//! file = ~/.vscode-sync/vscode-sync.log
//! ```
//!
//! CLI arguments override config file values when specified.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "VSCODE_SYNC_CONFIG";

/// Default settings directory, relative to the working directory.
pub const DEFAULT_SETTINGS_DIR: &str = ".vscode";

/// Default HTTP timeout for remote stores, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write config {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Secret store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Local JSON files under `secrets_dir`.
    File,
    /// Azure Key Vault REST API.
    #[default]
    KeyVault,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::KeyVault => "keyvault",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "keyvault" | "key-vault" | "azure" => Ok(BackendKind::KeyVault),
            other => Err(format!("unknown backend '{}', expected file or keyvault", other)),
        }
    }
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Settings directory to pack and unpack.
    pub directory: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_SETTINGS_DIR),
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: BackendKind,
    /// Default vault when `--vault` is not given.
    pub vault: Option<String>,
    /// Default group when `--group` is not given.
    pub group: Option<String>,
    /// Root directory for the file backend.
    pub secrets_dir: PathBuf,
    /// Timeout for remote requests, in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            vault: None,
            group: None,
            secrets_dir: config_dir().join("secrets"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Also write logs to this file when set.
    pub file: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub sync: SyncSettings,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from [`config_file_path`]; a missing file yields defaults.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        Self::parse(&text)
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        if let Some(dir) = value(&ini, "sync", "directory") {
            config.sync.directory = expand_tilde(dir);
        }

        if let Some(backend) = value(&ini, "store", "backend") {
            config.store.backend = backend
                .parse()
                .map_err(|reason| invalid("store.backend", backend, reason))?;
        }
        config.store.vault = value(&ini, "store", "vault").map(str::to_string);
        config.store.group = value(&ini, "store", "group").map(str::to_string);
        if let Some(dir) = value(&ini, "store", "secrets_dir") {
            config.store.secrets_dir = expand_tilde(dir);
        }
        if let Some(timeout) = value(&ini, "store", "timeout_secs") {
            config.store.timeout_secs = match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(invalid(
                        "store.timeout_secs",
                        timeout,
                        "expected a positive number of seconds".to_string(),
                    ))
                }
            };
        }

        config.logging.file = value(&ini, "logging", "file").map(expand_tilde);

        Ok(config)
    }

    /// Render as INI text.
    pub fn to_ini_string(&self) -> String {
        let mut ini = Ini::new();
        ini.with_section(Some("sync"))
            .set("directory", self.sync.directory.display().to_string());
        ini.with_section(Some("store"))
            .set("backend", self.store.backend.as_str())
            .set("vault", self.store.vault.clone().unwrap_or_default())
            .set("group", self.store.group.clone().unwrap_or_default())
            .set("secrets_dir", self.store.secrets_dir.display().to_string())
            .set("timeout_secs", self.store.timeout_secs.to_string());
        ini.with_section(Some("logging")).set(
            "file",
            self.logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );

        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = ini.write_to(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, self.to_ini_string()).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write to [`config_file_path`].
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&config_file_path())
    }
}

/// Non-empty trimmed value of `section.key`.
fn value<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|s| s.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn invalid(key: &str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Base directory for configuration and local data: `~/.vscode-sync`.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vscode-sync")
}

/// Path of the configuration file, honouring [`CONFIG_ENV_VAR`].
pub fn config_file_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir().join("config.ini"),
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
