//! vscode-sync - VS Code settings packing and secret-store sync
//!
//! This library packs a local settings directory (usually `.vscode`) into a
//! single JSON document that fits in one secret value, and unpacks such a
//! document back onto disk.
//!
//! # Architecture
//!
//! ```text
//! settings dir ──scan──► ScanResult ──build──► Document ──to_json──► SecretStore
//!                                                  │
//!                          preview ◄───────────────┤
//!                                                  ▼
//! settings dir ◄──────────────── materialize ◄── Document::from_json
//! ```
//!
//! The CLI crate wires these pieces to argument parsing, console output and
//! the interactive overwrite prompt.

pub mod config;
pub mod logging;
pub mod naming;
pub mod pack;
pub mod store;
pub mod sync;

/// Crate version, recorded in logs and local secret files.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the greeting shown when the tool runs without an action.
pub fn greeting() -> String {
    String::from("Hello, World!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_returns_hello_message() {
        let message = greeting();
        assert_eq!(message, "Hello, World!");
    }

    #[test]
    fn test_greeting_is_not_empty() {
        let message = greeting();
        assert!(!message.is_empty(), "Greeting should not be empty");
    }
}
