//! CLI error type.

use thiserror::Error;
use vscode_sync::config::ConfigError;
use vscode_sync::logging::LoggingError;
use vscode_sync::pack::PackError;
use vscode_sync::store::StoreError;
use vscode_sync::sync::SyncError;

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("{0}")]
    Pack(#[from] PackError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
