//! Unpack command - download stored settings and write them to disk.

use std::path::Path;

use vscode_sync::pack::{materialize_with_events, MaterializeEvent, OverwritePrompt};
use vscode_sync::store::SecretStore;
use vscode_sync::sync::download;

use crate::commands::common::StoreTarget;
use crate::error::CliError;
use crate::output::Output;

/// Run the unpack command.
pub fn run(
    out: &dyn Output,
    directory: &Path,
    store: &dyn SecretStore,
    target: &StoreTarget,
    prompt: &mut dyn OverwritePrompt,
) -> Result<(), CliError> {
    let document = download(store, &target.secret)?;

    let mut notify = |event: &MaterializeEvent| match event {
        MaterializeEvent::CreatedRoot(path) => {
            out.success(&format!("Created {} directory", path.display()))
        }
        MaterializeEvent::Written(path) => out.success(&format!("Created {}", path.display())),
        MaterializeEvent::Skipped(path) => out.warn(&format!("Skipping {}", path.display())),
    };
    let report = materialize_with_events(&document, directory, prompt, &mut notify)?;

    tracing::debug!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Unpack finished"
    );
    Ok(())
}
