//! The settings document and its file entries.
//!
//! A [`Document`] is the serialized form of one settings directory. It is
//! built from a directory scan or decoded from a stored secret, and is never
//! mutated afterwards.
//!
//! # Wire format
//!
//! ```text
//! {
//!   "metadata": {"format_version": "1.0", "created_at": "...", "description": "..."},
//!   "directory_structure": {"vscode": ["settings.json", ".env"]},
//!   "files": [
//!     {"path": "settings.json", "content_type": "application/json",
//!      "description": "", "content": {...}, "content_text": null}
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{PackError, PackResult};

/// Format version written into every new document.
pub const FORMAT_VERSION: &str = "1.0";

/// Group key used in `directory_structure` for the settings directory.
pub const DEFAULT_GROUP: &str = "vscode";

/// Description written into the metadata of every new document.
pub const DEFAULT_DESCRIPTION: &str = "VS Code settings pack";

/// How an entry's content is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// Parsed JSON, stored in `content`.
    #[serde(rename = "application/json")]
    Json,
    /// Raw text, stored in `content_text`.
    #[serde(rename = "text/plain")]
    Text,
}

impl ContentType {
    /// MIME string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Text => "text/plain",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a packed file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileBody {
    /// A JSON file that parsed successfully.
    Json(Value),
    /// Any other file, including `.json` files that failed to parse.
    Text(String),
}

impl FileBody {
    pub fn content_type(&self) -> ContentType {
        match self {
            FileBody::Json(_) => ContentType::Json,
            FileBody::Text(_) => ContentType::Text,
        }
    }
}

/// One file inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFileEntry", into = "RawFileEntry")]
pub struct FileEntry {
    /// Path relative to the settings directory, `/`-separated.
    pub path: String,
    /// Free-text description; empty for entries produced by a scan.
    pub description: String,
    pub body: FileBody,
}

impl FileEntry {
    /// Create a JSON entry.
    pub fn json(path: impl Into<String>, content: Value) -> Self {
        Self {
            path: path.into(),
            description: String::new(),
            body: FileBody::Json(content),
        }
    }

    /// Create a text entry.
    pub fn text(path: impl Into<String>, content_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: String::new(),
            body: FileBody::Text(content_text.into()),
        }
    }

    /// Set the description (builder pattern).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.body.content_type()
    }

    /// The parsed JSON content, if this is a JSON entry.
    pub fn content(&self) -> Option<&Value> {
        match &self.body {
            FileBody::Json(value) => Some(value),
            FileBody::Text(_) => None,
        }
    }

    /// The raw text, if this is a text entry.
    pub fn content_text(&self) -> Option<&str> {
        match &self.body {
            FileBody::Json(_) => None,
            FileBody::Text(text) => Some(text),
        }
    }
}

/// Wire shape of a file entry, with both content fields always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFileEntry {
    path: String,
    content_type: ContentType,
    #[serde(default)]
    description: String,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    content_text: Option<String>,
}

impl TryFrom<RawFileEntry> for FileEntry {
    type Error = PackError;

    fn try_from(raw: RawFileEntry) -> Result<Self, Self::Error> {
        let body = match raw.content_type {
            ContentType::Json => {
                if raw.content_text.is_some() {
                    return Err(PackError::InconsistentEntry {
                        path: raw.path,
                        reason: "application/json entry also carries content_text".to_string(),
                    });
                }
                // `"content": null` is a JSON file whose document is `null`.
                FileBody::Json(raw.content.unwrap_or(Value::Null))
            }
            ContentType::Text => {
                if raw.content.is_some() {
                    return Err(PackError::InconsistentEntry {
                        path: raw.path,
                        reason: "text/plain entry also carries content".to_string(),
                    });
                }
                match raw.content_text {
                    Some(text) => FileBody::Text(text),
                    None => {
                        return Err(PackError::InconsistentEntry {
                            path: raw.path,
                            reason: "text/plain entry has no content_text".to_string(),
                        })
                    }
                }
            }
        };

        Ok(FileEntry {
            path: raw.path,
            description: raw.description,
            body,
        })
    }
}

impl From<FileEntry> for RawFileEntry {
    fn from(entry: FileEntry) -> Self {
        let content_type = entry.content_type();
        let (content, content_text) = match entry.body {
            FileBody::Json(value) => (Some(value), None),
            FileBody::Text(text) => (None, Some(text)),
        };
        RawFileEntry {
            path: entry.path,
            content_type,
            description: entry.description,
            content,
            content_text,
        }
    }
}

/// Document metadata.
///
/// Only `format_version` is required. Unknown keys written by newer
/// versions are kept in `extra` so a decode/encode cycle preserves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metadata {
    /// Metadata for a document created at `created_at`.
    pub fn new(created_at: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            created_at: Some(created_at.into()),
            description: Some(DEFAULT_DESCRIPTION.to_string()),
            extra: BTreeMap::new(),
        }
    }

    /// Key/value pairs in display order: the known keys first, then extras
    /// sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![("format_version".to_string(), self.format_version.clone())];
        if let Some(created_at) = &self.created_at {
            entries.push(("created_at".to_string(), created_at.clone()));
        }
        if let Some(description) = &self.description {
            entries.push(("description".to_string(), description.clone()));
        }
        for (key, value) in &self.extra {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            entries.push((key.clone(), rendered));
        }
        entries
    }
}

/// A packed settings directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    metadata: Metadata,
    #[serde(default)]
    directory_structure: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    files: Vec<FileEntry>,
}

impl Document {
    /// Assemble a document, checking that entry paths are unique and safe.
    pub fn new(
        metadata: Metadata,
        directory_structure: BTreeMap<String, Vec<String>>,
        files: Vec<FileEntry>,
    ) -> PackResult<Self> {
        let document = Self {
            metadata,
            directory_structure,
            files,
        };
        document.validate()?;
        Ok(document)
    }

    /// Decode a document from its JSON text.
    pub fn from_json(json: &str) -> PackResult<Self> {
        let document: Document =
            serde_json::from_str(json).map_err(|e| PackError::InvalidDocument(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    /// Encode as compact JSON, the form stored in a secret.
    pub fn to_json(&self) -> PackResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn directory_structure(&self) -> &BTreeMap<String, Vec<String>> {
        &self.directory_structure
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Look up an entry by its relative path.
    pub fn entry(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn validate(&self) -> PackResult<()> {
        let mut seen = HashSet::with_capacity(self.files.len());
        for entry in &self.files {
            check_entry_path(&entry.path)?;
            if !seen.insert(entry.path.as_str()) {
                return Err(PackError::DuplicatePath(entry.path.clone()));
            }
        }
        Ok(())
    }
}

/// Reject paths that would land outside the target directory on unpack.
fn check_entry_path(path: &str) -> PackResult<()> {
    if path.is_empty() {
        return Err(PackError::UnsafePath(path.to_string()));
    }
    let confined = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !confined || path.contains('\\') {
        return Err(PackError::UnsafePath(path.to_string()));
    }
    Ok(())
}
