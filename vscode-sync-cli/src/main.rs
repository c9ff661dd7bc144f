//! vscode-sync CLI - Command-line interface
//!
//! Packs the workspace settings directory into a single secret, previews
//! what would be packed, and restores it on another machine.

mod cli;
mod commands;
mod error;
mod output;
mod prompt;

use std::process;

use clap::Parser;
use vscode_sync::config::{config_file_path, ConfigFile};
use vscode_sync::logging::init_logging;
use vscode_sync::naming::current_secret_name;

use cli::{Action, Cli};
use commands::common::{self, StoreTarget};
use error::CliError;
use output::{ConsoleOutput, Output};
use prompt::ConfirmPrompt;

fn main() {
    let cli = Cli::parse();
    let out = ConsoleOutput;

    if let Err(e) = run(cli, &out) {
        out.error(&format!("Error: {}", e));
        process::exit(1);
    }
}

fn run(cli: Cli, out: &dyn Output) -> Result<(), CliError> {
    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let config = ConfigFile::load_from(&config_path)?;

    // Vault and group are checked before anything touches the filesystem.
    let vault_group = if cli.requests_store() && !cli.init_config {
        Some(common::resolve_vault_group(&cli, &config)?)
    } else {
        None
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    if cli.init_config {
        return commands::init::run(out, &config_path);
    }

    let action = cli.action();
    let directory = common::resolve_directory(&cli, &config);

    let secret = match &cli.secret {
        Some(secret) => secret.clone(),
        None => {
            let secret = current_secret_name()?;
            out.println(&format!("Using default secret name: {}", secret));
            secret
        }
    };

    tracing::debug!(?action, directory = %directory.display(), secret = %secret, "Starting");

    match (action, vault_group) {
        (Action::Preview, _) => commands::preview::run(out, &directory),
        (Action::Pack, Some((vault, group))) | (Action::Unpack, Some((vault, group))) => {
            let target = StoreTarget {
                backend: common::resolve_backend(&cli, &config),
                vault,
                group,
                secret,
            };
            let store = common::open_store(target.backend, &target.vault, &config)?;
            if action == Action::Pack {
                commands::pack::run(out, &directory, store.as_ref(), &target)
            } else {
                let mut prompt = ConfirmPrompt::new(cli.yes);
                commands::unpack::run(out, &directory, store.as_ref(), &target, &mut prompt)
            }
        }
        (Action::Pack, None) | (Action::Unpack, None) => Err(CliError::Usage(
            common::MISSING_TARGET_MESSAGE.to_string(),
        )),
        (Action::None, _) => {
            out.println(&vscode_sync::greeting());
            out.warn("No action specified. Use --preview, --pack, or --unpack");
            out.println("Run 'vscode-sync --help' for more information");
            Ok(())
        }
    }
}
