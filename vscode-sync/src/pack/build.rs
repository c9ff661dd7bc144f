//! Building a [`Document`] from scanned files.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use serde_json::Value;

use super::error::{PackError, PackResult};
use super::scan::ScanResult;
use super::types::{Document, FileEntry, Metadata, DEFAULT_DESCRIPTION, DEFAULT_GROUP};

/// Builds documents from a list of files.
///
/// Reads files only; never writes or touches the network.
///
/// # Example
///
/// ```
/// use vscode_sync::pack::DocumentBuilder;
///
/// let document = DocumentBuilder::new()
///     .created_at("2025-01-01T00:00:00+00:00")
///     .build(&[], &[])
///     .unwrap();
///
/// assert!(document.is_empty());
/// assert_eq!(document.metadata().format_version, "1.0");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    created_at: Option<String>,
    description: String,
    group: String,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            created_at: None,
            description: DEFAULT_DESCRIPTION.to_string(),
            group: DEFAULT_GROUP.to_string(),
        }
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed creation timestamp instead of the current time.
    pub fn created_at(mut self, timestamp: impl Into<String>) -> Self {
        self.created_at = Some(timestamp.into());
        self
    }

    /// Set the metadata description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the `directory_structure` group key.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Build a document from a directory scan.
    pub fn build_from_scan(&self, scan: &ScanResult) -> PackResult<Document> {
        self.build(&scan.files, &scan.relative_paths)
    }

    /// Build a document from files and their relative paths.
    ///
    /// `relative_paths[i]` names `files[i]` inside the document; when the
    /// list is shorter, the file name is used instead. Paths that are not
    /// regular files are skipped.
    pub fn build(&self, files: &[PathBuf], relative_paths: &[String]) -> PackResult<Document> {
        let created_at = self
            .created_at
            .clone()
            .unwrap_or_else(|| Local::now().to_rfc3339_opts(SecondsFormat::Micros, false));

        let mut metadata = Metadata::new(created_at);
        metadata.description = Some(self.description.clone());

        let mut directory_structure = BTreeMap::new();
        directory_structure.insert(self.group.clone(), relative_paths.to_vec());

        let mut entries = Vec::with_capacity(files.len());
        for (i, file) in files.iter().enumerate() {
            if !file.is_file() {
                continue;
            }
            let relative = relative_paths.get(i).cloned().unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            entries.push(read_entry(file, relative)?);
        }

        let document = Document::new(metadata, directory_structure, entries)?;
        tracing::info!(files = document.len(), "Built settings document");
        Ok(document)
    }
}

/// Build a document with default metadata and the current time.
pub fn build_document(files: &[PathBuf], relative_paths: &[String]) -> PackResult<Document> {
    DocumentBuilder::new().build(files, relative_paths)
}

/// Read one file into an entry.
///
/// `.json` files that fail to parse fall back to text without reporting an
/// error.
fn read_entry(file: &Path, relative: String) -> PackResult<FileEntry> {
    let bytes = fs::read(file).map_err(|e| PackError::Read {
        path: file.to_path_buf(),
        source: e,
    })?;

    if file.extension() == Some(OsStr::new("json")) {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(content) => return Ok(FileEntry::json(relative, content)),
            Err(e) => {
                tracing::debug!(path = %relative, error = %e, "JSON parse failed, storing as text");
            }
        }
    }

    let text = String::from_utf8(bytes).map_err(|_| PackError::NotText {
        path: file.to_path_buf(),
    })?;
    Ok(FileEntry::text(relative, text))
}
