//! Pack command - scan the settings directory and upload it.

use std::path::Path;

use vscode_sync::pack::{scan, DocumentBuilder};
use vscode_sync::store::SecretStore;
use vscode_sync::sync::upload;

use crate::commands::common::StoreTarget;
use crate::error::CliError;
use crate::output::Output;

/// Run the pack command.
pub fn run(
    out: &dyn Output,
    directory: &Path,
    store: &dyn SecretStore,
    target: &StoreTarget,
) -> Result<(), CliError> {
    let found = scan(directory)?;
    if found.missing {
        out.warn(&format!(
            "No {} directory found. Will create it when unpacking.",
            directory.display()
        ));
    }
    if found.is_empty() {
        out.warn(&format!("No files to pack in {} directory", directory.display()));
        return Ok(());
    }

    let document = DocumentBuilder::new().build_from_scan(&found)?;
    upload(store, &target.secret, &target.group, &document)?;

    out.success(&format!(
        "Successfully saved settings to {} secret: {}",
        store_label(store),
        target.secret
    ));
    out.indented(&format!("{} files, group '{}'", document.len(), target.group));
    Ok(())
}

/// Human name of a backend for messages.
pub fn store_label(store: &dyn SecretStore) -> &'static str {
    match store.backend() {
        "keyvault" => "KeyVault",
        "file" => "local vault",
        _ => "store",
    }
}
