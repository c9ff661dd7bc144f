//! Moving documents in and out of a secret store.

use thiserror::Error;

use crate::pack::{Document, PackError};
use crate::store::{group_tags, SecretStore, StoreError};

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors from uploading or downloading a settings document.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Store `document` as the secret `secret`, tagged with `group`.
pub fn upload(
    store: &dyn SecretStore,
    secret: &str,
    group: &str,
    document: &Document,
) -> SyncResult<()> {
    let payload = document.to_json()?;
    store.put(secret, &payload, &group_tags(group))?;
    tracing::info!(
        backend = store.backend(),
        secret = %secret,
        group = %group,
        files = document.len(),
        bytes = payload.len(),
        "Uploaded settings document"
    );
    Ok(())
}

/// Fetch and decode the document stored as `secret`.
pub fn download(store: &dyn SecretStore, secret: &str) -> SyncResult<Document> {
    let payload = store.get(secret)?;
    let document = Document::from_json(&payload)?;
    tracing::info!(
        backend = store.backend(),
        secret = %secret,
        files = document.len(),
        "Downloaded settings document"
    );
    Ok(document)
}
