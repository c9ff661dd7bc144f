//! Integration tests for the pack/unpack cycle.
//!
//! These tests exercise the full flow:
//! - settings directory → scan → document → JSON
//! - JSON → document → materialize into an empty directory
//! - secret store upload/download between the two halves
//!
//! Run with: `cargo test --test pack_roundtrip`

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use vscode_sync::pack::{
    materialize, preview, scan, AlwaysOverwrite, ContentType, Document, DocumentBuilder,
    NeverOverwrite,
};
use vscode_sync::store::{FileSecretStore, MemorySecretStore};
use vscode_sync::sync::{download, upload};

// ============================================================================
// Helper Functions
// ============================================================================

/// Write `content` to `dir/name`, creating parent directories.
fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A typical workspace settings directory.
fn sample_settings_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "settings.json",
        r#"{"editor.fontSize":14,"files.autoSave":"afterDelay"}"#,
    );
    write_file(temp.path(), ".env", "API_KEY=test-key\nDEBUG=true");
    write_file(
        temp.path(),
        "launch.json",
        "{\n  // JSONC comments are not JSON\n  \"version\": \"0.2.0\"\n}\n",
    );
    write_file(temp.path(), "snippets/rust.json", r#"{"log":{"prefix":"log"}}"#);
    temp
}

/// Pack `dir`, send it through JSON, and unpack it into a fresh directory.
fn round_trip(dir: &Path) -> TempDir {
    let found = scan(dir).unwrap();
    let document = DocumentBuilder::new().build_from_scan(&found).unwrap();
    let decoded = Document::from_json(&document.to_json().unwrap()).unwrap();
    assert_eq!(decoded, document);

    let out = TempDir::new().unwrap();
    materialize(&decoded, out.path(), &mut NeverOverwrite).unwrap();
    out
}

/// Compare a restored file with its original.
fn assert_equivalent(original: &Path, restored: &Path) {
    let before = fs::read_to_string(original).unwrap();
    let after = fs::read_to_string(restored).unwrap();

    let is_json = original.extension().map(|e| e == "json").unwrap_or(false);
    match (is_json, serde_json::from_str::<Value>(&before)) {
        (true, Ok(parsed)) => {
            let reparsed: Value = serde_json::from_str(&after).unwrap();
            assert_eq!(parsed, reparsed, "JSON mismatch for {}", original.display());
        }
        _ => assert_eq!(before, after, "text mismatch for {}", original.display()),
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_directory_round_trip_restores_every_file() {
    let source = sample_settings_dir();
    let restored = round_trip(source.path());

    for rel in [".env", "settings.json", "launch.json", "snippets/rust.json"] {
        assert_equivalent(&source.path().join(rel), &restored.path().join(rel));
    }
}

#[test]
fn test_round_trip_keeps_json_key_order() {
    let source = TempDir::new().unwrap();
    write_file(
        source.path(),
        "settings.json",
        r#"{"workbench.colorTheme":"x","editor.fontSize":14,"a":{"z":1,"b":2}}"#,
    );

    let restored = round_trip(source.path());

    assert_eq!(
        fs::read_to_string(restored.path().join("settings.json")).unwrap(),
        "{\n  \"workbench.colorTheme\": \"x\",\n  \"editor.fontSize\": 14,\n  \"a\": {\n    \"z\": 1,\n    \"b\": 2\n  }\n}"
    );
}

#[test]
fn test_document_entries_have_expected_types() {
    let source = sample_settings_dir();
    let document = DocumentBuilder::new()
        .build_from_scan(&scan(source.path()).unwrap())
        .unwrap();

    let types: BTreeMap<_, _> = document
        .files()
        .iter()
        .map(|f| (f.path.as_str(), f.content_type()))
        .collect();

    assert_eq!(types[".env"], ContentType::Text);
    assert_eq!(types["settings.json"], ContentType::Json);
    assert_eq!(types["launch.json"], ContentType::Text);
    assert_eq!(types["snippets/rust.json"], ContentType::Json);
    assert_eq!(
        document.entry("settings.json").unwrap().content(),
        Some(&json!({"editor.fontSize": 14, "files.autoSave": "afterDelay"}))
    );
}

#[test]
fn test_pack_upload_download_unpack_through_file_store() {
    let source = sample_settings_dir();
    let secrets = TempDir::new().unwrap();
    let store = FileSecretStore::new(secrets.path(), "team-vault").unwrap();

    let document = DocumentBuilder::new()
        .build_from_scan(&scan(source.path()).unwrap())
        .unwrap();
    upload(&store, "project-vscode-settings", "laptops", &document).unwrap();

    let fetched = download(&store, "project-vscode-settings").unwrap();
    assert_eq!(fetched, document);
    assert_eq!(store.tags("project-vscode-settings").unwrap()["group"], "laptops");

    let target = TempDir::new().unwrap();
    let report = materialize(&fetched, &target.path().join(".vscode"), &mut AlwaysOverwrite)
        .unwrap();
    assert!(report.created_root);
    assert_eq!(report.written.len(), 4);
}

#[test]
fn test_unpack_twice_with_declined_overwrites_changes_nothing() {
    let store = MemorySecretStore::new();
    let source = sample_settings_dir();
    let document = DocumentBuilder::new()
        .build_from_scan(&scan(source.path()).unwrap())
        .unwrap();
    upload(&store, "s", "g", &document).unwrap();

    let target = TempDir::new().unwrap();
    let first = materialize(&download(&store, "s").unwrap(), target.path(), &mut NeverOverwrite)
        .unwrap();
    assert_eq!(first.written.len(), 4);

    write_file(target.path(), ".env", "LOCAL=1");
    let second = materialize(&download(&store, "s").unwrap(), target.path(), &mut NeverOverwrite)
        .unwrap();

    assert!(second.written.is_empty());
    assert_eq!(second.skipped.len(), 4);
    assert_eq!(
        fs::read_to_string(target.path().join(".env")).unwrap(),
        "LOCAL=1"
    );
}

#[test]
fn test_missing_directory_packs_to_empty_document() {
    let temp = TempDir::new().unwrap();
    let found = scan(&temp.path().join(".vscode")).unwrap();
    assert!(found.missing);

    let document = DocumentBuilder::new().build_from_scan(&found).unwrap();
    assert!(document.is_empty());
    assert!(preview(&document).files.is_empty());
}

// ============================================================================
// Property Tests
// ============================================================================

/// File names that are valid on every platform.
fn file_stem() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,10}"
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[ -~]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z.]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_round_trip_preserves_content(
        texts in prop::collection::btree_map(file_stem(), "[ -~\n]{0,200}", 0..5),
        jsons in prop::collection::btree_map(file_stem(), json_value(), 0..5),
    ) {
        let source = TempDir::new().unwrap();
        for (stem, text) in &texts {
            write_file(source.path(), &format!("{}.txt", stem), text);
        }
        for (stem, value) in &jsons {
            write_file(
                source.path(),
                &format!("conf/{}.json", stem),
                &serde_json::to_string(value).unwrap(),
            );
        }

        let restored = round_trip(source.path());

        for stem in texts.keys() {
            let rel = format!("{}.txt", stem);
            prop_assert_eq!(
                fs::read_to_string(source.path().join(&rel)).unwrap(),
                fs::read_to_string(restored.path().join(&rel)).unwrap()
            );
        }
        for (stem, value) in &jsons {
            let rel = format!("conf/{}.json", stem);
            let restored_value: Value =
                serde_json::from_str(&fs::read_to_string(restored.path().join(&rel)).unwrap())
                    .unwrap();
            prop_assert_eq!(value, &restored_value);
        }
    }
}
