//! Writing a [`Document`] back onto disk.
//!
//! Unpacking is not transactional: entries are written in document order and
//! the first failure is returned immediately, leaving earlier files in place.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{PackError, PackResult};
use super::types::{Document, FileBody};

/// Decides whether an existing file may be replaced.
pub trait OverwritePrompt {
    /// Return `true` to overwrite `path`, `false` to keep it.
    fn confirm_overwrite(&mut self, path: &Path) -> bool;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self(path)
    }
}

/// Replaces every existing file without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOverwrite;

impl OverwritePrompt for AlwaysOverwrite {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        true
    }
}

/// Keeps every existing file.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverOverwrite;

impl OverwritePrompt for NeverOverwrite {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        false
    }
}

/// Progress notifications emitted while unpacking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeEvent {
    /// The target directory did not exist and was created.
    CreatedRoot(PathBuf),
    /// A file was written.
    Written(PathBuf),
    /// An existing file was kept because overwriting was declined.
    Skipped(PathBuf),
}

/// Outcome of a completed unpack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub created_root: bool,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write every entry of `document` under `target`.
pub fn materialize(
    document: &Document,
    target: &Path,
    prompt: &mut dyn OverwritePrompt,
) -> PackResult<MaterializeReport> {
    materialize_with_events(document, target, prompt, &mut |_: &MaterializeEvent| {})
}

/// Like [`materialize`], reporting each step to `on_event` as it happens.
///
/// Events are delivered before the next entry is processed, so a caller
/// sees every file that was written even when a later write fails.
pub fn materialize_with_events(
    document: &Document,
    target: &Path,
    prompt: &mut dyn OverwritePrompt,
    on_event: &mut dyn FnMut(&MaterializeEvent),
) -> PackResult<MaterializeReport> {
    let mut report = MaterializeReport::default();

    if !target.exists() {
        create_dir_all(target)?;
        report.created_root = true;
        on_event(&MaterializeEvent::CreatedRoot(target.to_path_buf()));
    }

    for entry in document.files() {
        let destination = target.join(&entry.path);

        if let Some(parent) = destination.parent() {
            create_dir_all(parent)?;
        }

        if destination.exists() && !prompt.confirm_overwrite(&destination) {
            tracing::info!(path = %destination.display(), "Keeping existing file");
            on_event(&MaterializeEvent::Skipped(destination.clone()));
            report.skipped.push(destination);
            continue;
        }

        let contents = match &entry.body {
            FileBody::Json(value) => serde_json::to_string_pretty(value)?,
            FileBody::Text(text) => text.clone(),
        };

        fs::write(&destination, contents).map_err(|e| PackError::Write {
            path: destination.clone(),
            source: e,
        })?;

        tracing::debug!(path = %destination.display(), "Wrote settings file");
        on_event(&MaterializeEvent::Written(destination.clone()));
        report.written.push(destination);
    }

    tracing::info!(
        target = %target.display(),
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Unpacked settings document"
    );

    Ok(report)
}

fn create_dir_all(path: &Path) -> PackResult<()> {
    fs::create_dir_all(path).map_err(|e| PackError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}
