//! Settings directory discovery.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::error::{PackError, PackResult};

/// Files found under a settings directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Directory that was scanned.
    pub root: PathBuf,

    /// Absolute (root-joined) paths of the regular files found, in discovery order.
    pub files: Vec<PathBuf>,

    /// `files` relative to `root`, `/`-separated, same order.
    pub relative_paths: Vec<String>,

    /// True when `root` did not exist. Not an error: the directory is
    /// created on unpack.
    pub missing: bool,
}

impl ScanResult {
    fn missing(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            missing: true,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Recursively list the regular files under `root`.
///
/// Entries are visited in file-name order within each directory. Symbolic
/// links are not followed into directories; a link that points at a regular
/// file is included.
pub fn scan(root: &Path) -> PackResult<ScanResult> {
    if !root.exists() {
        tracing::info!(
            directory = %root.display(),
            "Settings directory not found; it will be created on unpack"
        );
        return Ok(ScanResult::missing(root));
    }

    let mut result = ScanResult {
        root: root.to_path_buf(),
        ..Default::default()
    };

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| PackError::Scan {
            path: root.to_path_buf(),
            source: e,
        })?;

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(rel) => to_slash_path(rel),
            Err(_) => continue,
        };

        tracing::trace!(path = %relative, "Discovered settings file");
        result.files.push(entry.into_path());
        result.relative_paths.push(relative);
    }

    tracing::debug!(
        directory = %root.display(),
        files = result.files.len(),
        "Scanned settings directory"
    );

    Ok(result)
}

/// Render a relative path with `/` separators regardless of platform.
fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
