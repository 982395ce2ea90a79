//! Runs the built binary and checks what lands on stdout and stderr.
//!
//! Stdout carries the report and, after a blank line, the JSON result.
//! Anything else the CLI has to say goes to stderr.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn run(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_block-reconcile"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "exit {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// The JSON that follows the report's last blank line.
fn trailing_json(stdout: &str) -> Value {
    let start = stdout.rfind("\n\n").map(|i| i + 2).unwrap_or(0);
    serde_json::from_str(&stdout[start..]).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

// ============================================================================
// Reconcile
// ============================================================================

#[test]
fn populate_with_nothing_to_add_keeps_stdout_json() {
    let tmp = TempDir::new().unwrap();
    let items = write(
        tmp.path(),
        "items.json",
        r#"[{"id": 1, "url": "https://example.test/?page_id=1", "label": "Home", "type": "page"}]"#,
    );
    let pages = write(
        tmp.path(),
        "pages.json",
        r#"[{"id": 1, "link": "https://example.test/?page_id=1", "title": {"rendered": "Home"}, "type": "page"}]"#,
    );
    let config = tmp.path().to_string_lossy().into_owned();

    let output = run(&[
        "--config", &config, "reconcile", "--items", &items, "--pages", &pages, "--populate",
    ]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(!stdout.contains("Nothing to add"));
    assert!(stderr.contains("Nothing to add"));
    let links = trailing_json(&stdout);
    assert_eq!(links.as_array().unwrap().len(), 1);
    assert_eq!(links[0]["id"], 1);
}

#[test]
fn populate_prints_added_links() {
    let tmp = TempDir::new().unwrap();
    let items = write(tmp.path(), "items.json", "[]");
    let pages = write(
        tmp.path(),
        "pages.json",
        r#"[
            {"id": 2, "link": "https://example.test/?page_id=2", "title": {"rendered": "About"}, "type": "page"},
            {"id": 5, "link": "https://example.test/?page_id=5", "title": {"rendered": "Contact"}, "type": "page"}
        ]"#,
    );
    let config = tmp.path().to_string_lossy().into_owned();

    let output = run(&[
        "--config", &config, "reconcile", "--items", &items, "--pages", &pages, "--populate",
    ]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("Missing pages: 2, 5"));
    let links = trailing_json(&stdout);
    let ids: Vec<i64> = links
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 5]);
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn merge_without_gallery_uses_configured_size_and_link() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "config.toml",
        "[gallery]\ndefault_size_slug = \"medium\"\nlink_to = \"media\"\n",
    );
    let selection = write(
        tmp.path(),
        "selection.json",
        r#"[{
            "id": 8,
            "url": "https://example.test/uploads/full.jpg",
            "sizes": {"medium": {"url": "https://example.test/uploads/8-300.jpg"}}
        }]"#,
    );
    let config = tmp.path().to_string_lossy().into_owned();

    let output = run(&["--config", &config, "merge", "--selection", &selection]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("    size: medium"));
    assert!(stdout.contains("    link to: media file"));
    let json = trailing_json(&stdout);
    let attributes = &json["attributes"];
    assert_eq!(attributes["images"][0]["url"], "https://example.test/uploads/8-300.jpg");
    assert_eq!(attributes["sizeSlug"], "medium");
    assert_eq!(attributes["linkTo"], "media");
}

#[test]
fn merge_keeps_size_stored_in_gallery() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "config.toml", "[gallery]\ndefault_size_slug = \"medium\"\n");
    let gallery = write(tmp.path(), "gallery.json", r#"{"images": [], "sizeSlug": "large"}"#);
    let selection = write(
        tmp.path(),
        "selection.json",
        r#"[{
            "id": 8,
            "url": "https://example.test/uploads/full.jpg",
            "sizes": {
                "medium": {"url": "https://example.test/uploads/8-300.jpg"},
                "large": {"url": "https://example.test/uploads/8-1024.jpg"}
            }
        }]"#,
    );
    let config = tmp.path().to_string_lossy().into_owned();

    let output = run(&[
        "--config", &config, "merge", "--gallery", &gallery, "--selection", &selection,
    ]);
    let json = trailing_json(&String::from_utf8(output.stdout).unwrap());

    assert_eq!(json["attributes"]["sizeSlug"], "large");
    assert_eq!(
        json["attributes"]["images"][0]["url"],
        "https://example.test/uploads/8-1024.jpg"
    );
}
