//! Logging setup.
//!
//! Logs go to stderr so they never mix with command output on stdout. An
//! optional log file receives the same events without ANSI colours.
//!
//! The `RUST_LOG` environment variable overrides the default filter.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Errors installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log file path has no file name: {}", .0.display())]
    InvalidLogFile(PathBuf),

    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install logger: {0}")]
    Init(String),
}

/// Keeps the background log-file writer alive.
///
/// Buffered lines are flushed when this is dropped, so hold it until the
/// program exits.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Default filter directive.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "vscode_sync=debug,vscode_sync_cli=debug,warn"
    } else {
        "vscode_sync=warn,vscode_sync_cli=warn,error"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

/// Install the global tracing subscriber.
///
/// # Arguments
///
/// * `verbose` - Log debug events from this crate
/// * `log_file` - Also append events to this file
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<LoggingGuard, LoggingError> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    let (file_layer, file_guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidLogFile(path.to_path_buf()))?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir).map_err(|e| LoggingError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::debug!(version = crate::VERSION, "Logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(true).contains("vscode_sync=debug"));
        assert!(default_filter(false).contains("vscode_sync=warn"));
    }

    #[test]
    fn test_log_file_without_name_is_rejected() {
        let result = init_logging(false, Some(Path::new("/")));
        assert!(matches!(result, Err(LoggingError::InvalidLogFile(_))));
    }
}
