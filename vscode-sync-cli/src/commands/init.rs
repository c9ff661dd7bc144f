//! Init command - write a default configuration file.

use std::path::Path;

use vscode_sync::config::ConfigFile;

use crate::error::CliError;
use crate::output::Output;

/// Write the default configuration to `path` unless a file already exists.
pub fn run(out: &dyn Output, path: &Path) -> Result<(), CliError> {
    if path.exists() {
        out.println(&format!("Configuration file already exists: {}", path.display()));
        return Ok(());
    }

    ConfigFile::default().save_to(path)?;

    out.success(&format!("Configuration file: {}", path.display()));
    out.newline();
    out.println("Edit this file to set your default vault, group and backend.");
    out.println("CLI arguments override config file values when specified.");
    Ok(())
}
