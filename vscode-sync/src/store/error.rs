//! Error types for secret stores.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for secret store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`SecretStore`](super::SecretStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No secret with this name exists.
    #[error("secret '{0}' not found")]
    NotFound(String),

    /// The secret or vault name is not acceptable to the backend.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Local storage could not be read or written.
    #[error("secret storage I/O failed at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The remote service rejected the credentials.
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// No credential is available for the remote service.
    #[error("missing credential: set {0}")]
    MissingCredential(String),

    /// The remote service returned an unexpected status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientSetup(String),

    /// The request could not be sent or the response not read.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// A stored or returned payload could not be decoded.
    #[error("malformed secret payload: {0}")]
    Parse(String),
}

impl StoreError {
    /// Whether the error means the secret simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
