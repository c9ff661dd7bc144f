//! Read-only summary of a document for display.

use super::types::{ContentType, Document, FileBody};

/// Longest content excerpt shown per file, in characters.
pub const PREVIEW_LIMIT: usize = 500;

/// Appended to excerpts cut at [`PREVIEW_LIMIT`].
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Size and type of one packed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: String,
    pub content_type: ContentType,
    /// Byte length of the stored form: compact JSON for JSON entries, the
    /// raw text otherwise. Not the size of the original file.
    pub size: usize,
}

/// Leading part of one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentExcerpt {
    pub path: String,
    pub excerpt: String,
    pub truncated: bool,
}

/// Everything a console renderer needs to show a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub metadata: Vec<(String, String)>,
    pub files: Vec<FileSummary>,
    pub contents: Vec<ContentExcerpt>,
}

impl Preview {
    /// Sum of all file sizes.
    pub fn total_size(&self) -> usize {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Summarize a document.
pub fn preview(document: &Document) -> Preview {
    let metadata = document.metadata().entries();

    let files = document
        .files()
        .iter()
        .map(|entry| FileSummary {
            path: entry.path.clone(),
            content_type: entry.content_type(),
            size: match &entry.body {
                FileBody::Json(value) => value.to_string().len(),
                FileBody::Text(text) => text.len(),
            },
        })
        .collect();

    let contents = document
        .files()
        .iter()
        .map(|entry| {
            let full = match &entry.body {
                FileBody::Json(value) => {
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
                }
                FileBody::Text(text) => text.clone(),
            };
            let (excerpt, truncated) = truncate_excerpt(&full, PREVIEW_LIMIT);
            ContentExcerpt {
                path: entry.path.clone(),
                excerpt,
                truncated,
            }
        })
        .collect();

    Preview {
        metadata,
        files,
        contents,
    }
}

/// Cut `text` to `limit` characters, appending [`TRUNCATION_MARKER`] when
/// anything was removed.
pub fn truncate_excerpt(text: &str, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut excerpt = String::with_capacity(cut + TRUNCATION_MARKER.len());
            excerpt.push_str(&text[..cut]);
            excerpt.push_str(TRUNCATION_MARKER);
            (excerpt, true)
        }
        None => (text.to_string(), false),
    }
}
