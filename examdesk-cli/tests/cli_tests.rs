//! Integration tests for the Examdesk CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Write a test document into the temp directory
fn create_test_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn examdesk() -> Command {
    Command::cargo_bin("examdesk").unwrap()
}

const LEGACY_DOCUMENT: &str = r#"[
    {"type": "text", "tag": "p", "text": "first", "listing": "bullet"},
    {"type": "text", "tag": "p", "text": "second", "listing": "bullet"},
    {"type": "text", "tag": "p", "spans": [{"text": "after"}]}
]"#;

#[test]
fn test_help() {
    examdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_version() {
    examdesk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("examdesk"));
}

#[test]
fn test_convert_help() {
    examdesk()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a content document"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"));
}

#[test]
fn test_batch_invalid_jobs() {
    examdesk()
        .args([
            "batch",
            "/some/input/dir",
            "--output-dir",
            "/some/output/dir",
            "--jobs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_convert_nonexistent_file() {
    examdesk()
        .args(["convert", "/nonexistent/file.json"])
        .assert()
        .failure();
}

#[test]
fn test_convert_blocks_to_markup() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(
        &temp_dir,
        "doc.json",
        r#"[{"type": "text", "spans": [{"text": "Hello", "bold": true}]}]"#,
    );

    examdesk()
        .args(["convert", input.to_str().unwrap(), "--to", "markup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p><strong>Hello</strong></p>"));
}

#[test]
fn test_convert_html_to_blocks_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "doc.html", "<ol><li><p>one</p></li></ol>");
    let output = temp_dir.path().join("doc.json");

    examdesk()
        .args([
            "convert",
            input.to_str().unwrap(),
            "--from",
            "html",
            "--to",
            "blocks",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0]["type"], "list");
    assert_eq!(written[0]["ordered"], true);
    assert_eq!(written[0]["children"][0]["type"], "listItem");
}

#[test]
fn test_convert_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "doc.json", "[]");

    examdesk()
        .args(["convert", input.to_str().unwrap(), "--to", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No writer available"));
}

#[test]
fn test_info_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "doc.json", LEGACY_DOCUMENT);

    let output = examdesk()
        .args(["info", input.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["blocks"], 3);
    assert_eq!(info["legacy_list_items"], 2);
    assert_eq!(info["excerpt"], "first second after");
}

#[test]
fn test_validate_skips_unknown_blocks_unless_strict() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(
        &temp_dir,
        "doc.json",
        r#"[{"type": "text", "spans": [{"text": "ok"}]}, {"type": "video"}]"#,
    );

    examdesk()
        .args(["validate", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unrecognized blocks: 1"));

    examdesk()
        .args(["validate", input.to_str().unwrap(), "--strict"])
        .assert()
        .failure();
}

#[test]
fn test_validate_rejects_non_array() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "doc.json", r#"{"type": "text"}"#);

    examdesk()
        .args(["validate", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_batch_migrates_legacy_lists() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    create_test_file(&input_dir, "legacy.json", LEGACY_DOCUMENT);
    create_test_file(&input_dir, "html.json", r#""<p>old <b>bold</b></p>""#);
    create_test_file(&input_dir, "notes.txt", "ignored");

    examdesk()
        .args([
            "batch",
            input_dir.path().to_str().unwrap(),
            "--output-dir",
            output_dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: 2"));

    let migrated = fs::read_to_string(output_dir.path().join("legacy.json")).unwrap();
    assert!(migrated.contains("\"list\""));
    assert!(!migrated.contains("listing"));

    examdesk()
        .args([
            "validate",
            output_dir.path().join("html.json").to_str().unwrap(),
            "--strict",
        ])
        .assert()
        .success();
}

#[test]
fn test_show_lists_and_renders_problems() {
    let data_dir = TempDir::new().unwrap();
    fs::create_dir_all(data_dir.path().join("problems")).unwrap();
    fs::write(
        data_dir.path().join("problems/1.json"),
        r#"{
            "id": 1,
            "examId": 7,
            "number": 1,
            "content": "<p>What is <b>2+2</b>?</p>",
            "explanation": [{"type": "text", "spans": [{"text": "Count."}]}],
            "choices": [{"number": 1, "content": "3"}, {"number": 2, "content": "4", "isAnswer": true}]
        }"#,
    )
    .unwrap();

    examdesk()
        .args(["show", "--exam", "7", "--data-path"])
        .arg(data_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] What is 2+2?"));

    examdesk()
        .args(["show", "--exam", "7", "--problem", "1", "--data-path"])
        .arg(data_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer: 2"))
        .stdout(predicate::str::contains("Explanation: Count."));

    examdesk()
        .args(["show", "--exam", "8", "--problem", "1", "--data-path"])
        .arg(data_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_upload_prints_signed_url() {
    let temp_dir = TempDir::new().unwrap();
    let image = create_test_file(&temp_dir, "figure.png", "not really a png");
    let data_dir = temp_dir.path().join("data");

    examdesk()
        .args(["upload", image.to_str().unwrap(), "--data-path"])
        .arg(&data_dir)
        .args(["--base-url", "https://cdn.test"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("https://cdn.test/images/"))
        .stdout(predicate::str::contains(".png?sig="));

    assert_eq!(fs::read_dir(data_dir.join("images")).unwrap().count(), 1);
}
