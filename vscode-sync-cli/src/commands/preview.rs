//! Preview command - show what would be packed.

use std::path::Path;

use vscode_sync::pack::{preview, scan, Document, DocumentBuilder, Preview};

use crate::error::CliError;
use crate::output::Output;

/// Run the preview command against `directory`.
pub fn run(out: &dyn Output, directory: &Path) -> Result<(), CliError> {
    let found = scan(directory)?;
    if found.missing {
        out.warn(&format!(
            "No {} directory found. Will create it when unpacking.",
            directory.display()
        ));
    }
    if found.is_empty() {
        out.warn(&format!(
            "No files to preview in {} directory",
            directory.display()
        ));
        return Ok(());
    }

    let document = DocumentBuilder::new().build_from_scan(&found)?;
    print_preview(out, &document);
    Ok(())
}

/// Render a document summary.
pub fn print_preview(out: &dyn Output, document: &Document) {
    let summary = preview(document);
    print_metadata(out, &summary);
    print_files(out, &summary);
    print_contents(out, &summary);
}

fn print_metadata(out: &dyn Output, summary: &Preview) {
    out.header("VS Code Settings Pack");
    let width = summary
        .metadata
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0);
    for (key, value) in &summary.metadata {
        out.indented(&format!("{:<width$}  {}", key, value, width = width));
    }
}

fn print_files(out: &dyn Output, summary: &Preview) {
    out.subheader(&format!("Files ({})", summary.files.len()));
    let width = summary
        .files
        .iter()
        .map(|f| f.path.chars().count())
        .max()
        .unwrap_or(0);
    for file in &summary.files {
        out.indented(&format!(
            "{:<width$}  {:<16}  {} bytes",
            file.path,
            file.content_type.as_str(),
            file.size,
            width = width
        ));
    }
    out.indented(&format!("Total: {} bytes", summary.total_size()));
}

fn print_contents(out: &dyn Output, summary: &Preview) {
    out.subheader("File Contents Preview");
    for content in &summary.contents {
        out.newline();
        out.println(&format!("{}:", content.path));
        let body = if content.excerpt.is_empty() {
            "(empty)"
        } else {
            content.excerpt.as_str()
        };
        for line in body.lines() {
            out.indented(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::RecordingOutput;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_preview_lists_files_and_content() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("settings.json"), r#"{"a":1}"#).unwrap();
        fs::write(temp.path().join(".env"), "KEY=value").unwrap();

        let out = RecordingOutput::default();
        run(&out, temp.path()).unwrap();

        let text = out.text();
        assert!(text.contains("format_version  1.0"));
        assert!(text.contains("application/json"));
        assert!(text.contains("text/plain"));
        assert!(text.contains("7 bytes"));
        assert!(text.contains("  KEY=value"));
    }

    #[test]
    fn test_empty_directory_prints_notice() {
        let temp = TempDir::new().unwrap();
        let out = RecordingOutput::default();
        run(&out, temp.path()).unwrap();
        assert!(out.text().contains("No files to preview"));
    }

    #[test]
    fn test_missing_directory_prints_both_notices() {
        let temp = TempDir::new().unwrap();
        let out = RecordingOutput::default();
        run(&out, &temp.path().join(".vscode")).unwrap();

        let text = out.text();
        assert!(text.contains("Will create it when unpacking"));
        assert!(text.contains("No files to preview"));
    }
}
