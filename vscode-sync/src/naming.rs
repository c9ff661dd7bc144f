//! Default secret names.

use std::io;
use std::path::Path;

/// Suffix appended to the directory name to form the default secret name.
pub const SECRET_SUFFIX: &str = "-vscode-settings";

/// Default secret name for a project directory: `"{dirname}-vscode-settings"`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use vscode_sync::naming::default_secret_name;
///
/// assert_eq!(default_secret_name(Path::new("/path/to/project")), "project-vscode-settings");
/// ```
pub fn default_secret_name(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", base, SECRET_SUFFIX)
}

/// Default secret name for the process working directory.
pub fn current_secret_name() -> io::Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(default_secret_name(&cwd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_name_uses_last_component() {
        assert_eq!(
            default_secret_name(Path::new("/path/to/project")),
            "project-vscode-settings"
        );
    }

    #[test]
    fn test_default_secret_name_ignores_trailing_slash() {
        assert_eq!(
            default_secret_name(Path::new("/work/api-server/")),
            "api-server-vscode-settings"
        );
    }

    #[test]
    fn test_default_secret_name_for_root() {
        assert_eq!(default_secret_name(Path::new("/")), "-vscode-settings");
    }

    #[test]
    fn test_current_secret_name_has_suffix() {
        let name = current_secret_name().unwrap();
        assert!(name.ends_with(SECRET_SUFFIX));
    }
}
