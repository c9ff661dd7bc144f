//! Error types for packing and unpacking settings documents.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for codec operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that can occur while scanning, building, decoding or
/// materializing a settings document.
#[derive(Debug, Error)]
pub enum PackError {
    /// Walking the settings directory failed.
    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Failed to read a settings file.
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// A settings file is neither JSON nor valid UTF-8 text.
    #[error("{} is not valid UTF-8 text", .path.display())]
    NotText { path: PathBuf },

    /// Failed to write a file during unpack.
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Failed to create a directory during unpack.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// Stored bytes are not a well-formed document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Two entries in one document share a path.
    #[error("duplicate path in document: {0}")]
    DuplicatePath(String),

    /// An entry path is empty, absolute, or climbs out of the target directory.
    #[error("unsafe path in document: '{0}'")]
    UnsafePath(String),

    /// An entry's content fields disagree with its content type.
    #[error("inconsistent entry '{path}': {reason}")]
    InconsistentEntry { path: String, reason: String },

    /// Encoding the document as JSON failed.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
