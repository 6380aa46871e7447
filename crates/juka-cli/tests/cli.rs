//! Integration tests: run the `juka` binary against temporary files.

use std::path::Path;
use std::process::{Command, Output};

fn juka(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_juka"))
        .args(args)
        .output()
        .expect("failed to run juka")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn new_then_lint() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_string_lossy().into_owned();

    let created = juka(&["new", "--out", &out_dir, "--title", "Kiosk"]);
    assert!(created.status.success());
    let path = dir.path().join("jukaconfig.json");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#""title": "Kiosk""#));
    assert!(text.contains(r#""type": "menu""#));

    let linted = juka(&["lint", &path.to_string_lossy(), "--deny-warnings"]);
    assert!(linted.status.success(), "{}", stdout(&linted));
}

#[test]
fn lint_deny_warnings_fails_on_dangling_scene() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "doc.json",
        r#"{"scenes":[{"name":"A","elements":[
            {"type":"button","trigger":"change_scene","sceneChange":"Gone"}
        ]}]}"#,
    );

    let relaxed = juka(&["validate", &path]);
    assert!(relaxed.status.success());
    assert!(stdout(&relaxed).contains("unknown-scene-target"));

    let strict = juka(&["lint", &path, "--deny-warnings"]);
    assert!(!strict.status.success());
}

#[test]
fn malformed_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.json", "{ nope");
    assert!(!juka(&["info", &path]).status.success());
}

#[test]
fn fmt_write_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "doc.json",
        r#"{"scenes":[{"name":"A","elements":[{"type":"label","x":"5","y":6}]}]}"#,
    );

    assert!(juka(&["fmt", &path, "--write"]).status.success());
    let first = std::fs::read_to_string(&path).unwrap();
    assert!(juka(&["fmt", &path, "--write"]).status.success());
    let second = std::fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);
    assert!(first.contains(r#""x": 5"#));
}

#[test]
fn fmt_rejects_bad_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.json", r#"{"scenes":[]}"#);
    assert!(!juka(&["fmt", &path, "--canvas", "wide"]).status.success());
}
