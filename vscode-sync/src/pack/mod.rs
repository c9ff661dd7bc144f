//! Pack/unpack codec for settings directories.
//!
//! # Flow
//!
//! ```text
//! scan(dir) ──► ScanResult ──► DocumentBuilder::build ──► Document
//!                                                            │
//!                         preview(&Document) ◄───────────────┤
//!                                                            ▼
//!                                     materialize(&Document, target, prompt)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vscode_sync::pack::{materialize, scan, AlwaysOverwrite, Document, DocumentBuilder};
//!
//! let found = scan(Path::new(".vscode"))?;
//! let document = DocumentBuilder::new().build_from_scan(&found)?;
//! let stored = document.to_json()?;
//!
//! let restored = Document::from_json(&stored)?;
//! materialize(&restored, Path::new("restored"), &mut AlwaysOverwrite)?;
//! # Ok::<(), vscode_sync::pack::PackError>(())
//! ```

mod build;
mod error;
mod materialize;
mod preview;
mod scan;
mod types;

pub use build::{build_document, DocumentBuilder};
pub use error::{PackError, PackResult};
pub use materialize::{
    materialize, materialize_with_events, AlwaysOverwrite, MaterializeEvent, MaterializeReport,
    NeverOverwrite, OverwritePrompt,
};
pub use preview::{
    preview, truncate_excerpt, ContentExcerpt, FileSummary, Preview, PREVIEW_LIMIT,
    TRUNCATION_MARKER,
};
pub use scan::{scan, ScanResult};
pub use types::{
    ContentType, Document, FileBody, FileEntry, Metadata, DEFAULT_DESCRIPTION, DEFAULT_GROUP,
    FORMAT_VERSION,
};
