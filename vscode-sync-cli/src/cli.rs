//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vscode_sync::config::BackendKind;

/// Pack, preview and restore VS Code workspace settings through a secret store.
#[derive(Debug, Parser)]
#[command(name = "vscode-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Key Vault name (or local vault directory for the file backend)
    #[arg(long)]
    pub vault: Option<String>,

    /// Group tag recorded on the stored secret
    #[arg(long)]
    pub group: Option<String>,

    /// Secret name (default: <current directory name>-vscode-settings)
    #[arg(long)]
    pub secret: Option<String>,

    /// Show what would be packed without touching the store
    #[arg(long)]
    pub preview: bool,

    /// Pack the settings directory and upload it
    #[arg(long)]
    pub pack: bool,

    /// Download the stored settings and write them to disk
    #[arg(long)]
    pub unpack: bool,

    /// Settings directory (default: .vscode, or [sync] directory in config)
    #[arg(long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Secret store backend (default: [store] backend in config, else keyvault)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Use this configuration file instead of ~/.vscode-sync/config.ini
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a default configuration file if none exists, then exit
    #[arg(long)]
    pub init_config: bool,
}

/// Backend selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BackendArg {
    /// JSON files under the configured secrets directory
    File,
    /// Azure Key Vault (token from AZURE_KEYVAULT_TOKEN)
    Keyvault,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => BackendKind::File,
            BackendArg::Keyvault => BackendKind::KeyVault,
        }
    }
}

/// The single operation a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Preview,
    Pack,
    Unpack,
    None,
}

impl Cli {
    /// Selected action. When several flags are given, preview wins over
    /// pack, and pack over unpack.
    pub fn action(&self) -> Action {
        if self.preview {
            Action::Preview
        } else if self.pack {
            Action::Pack
        } else if self.unpack {
            Action::Unpack
        } else {
            Action::None
        }
    }

    /// Whether a store operation was requested. Vault and group are
    /// required whenever this holds, even if `--preview` takes precedence.
    pub fn requests_store(&self) -> bool {
        self.pack || self.unpack
    }
}
