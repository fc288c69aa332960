use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture() -> PathBuf {
    let path = repo_root().join("fixtures").join("whitepaper").join("sample.md");
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn folio() -> Command {
    Command::new(assert_cmd::cargo_bin!("folio"))
}

#[test]
fn cli_renders_a_standalone_page() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("paper.html");

    folio()
        .args([
            "render",
            "--theme",
            "dark",
            "--collapse",
            "9-metrics",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture().to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let html = fs::read_to_string(&out).expect("read html");
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains(r#"data-theme="dark""#));
    assert!(html.contains(r#"data-diagram="solution-0""#));
    assert!(html.contains(r#""collapsed":["9-metrics"]"#));
}

#[test]
fn cli_reads_markdown_from_stdin() {
    let output = folio()
        .args(["render", "--motion", "off"])
        .write_stdin("## Hello\n\nWorld\n")
        .output()
        .expect("run folio");
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).expect("utf8");
    assert!(html.contains(r#"data-motion="off""#));
    assert!(html.contains(r#"data-section="hello""#));
}

#[test]
fn cli_detects_diagram_payloads() {
    let output = folio()
        .args(["detect", fixture().to_string_lossy().as_ref()])
        .output()
        .expect("run folio");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "0\tsolution");
    assert_eq!(lines[2], "2\t-");
}

#[test]
fn cli_exits_3_without_any_diagram() {
    folio()
        .arg("detect")
        .write_stdin("plain prose\n\n```rust\nfn main() {}\n```\n")
        .assert()
        .code(3);
}

#[test]
fn cli_prints_the_outline_as_json() {
    let output = folio()
        .args(["outline", "--json", "--collapse", "6-tokenomics"])
        .arg(fixture())
        .output()
        .expect("run folio");
    assert!(output.status.success());
    let outline: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let sections = outline["sections"].as_array().expect("sections");
    assert_eq!(sections.len(), 10);
    assert_eq!(sections[5]["id"], "6-tokenomics");
    assert_eq!(sections[5]["collapsed"], true);
    assert_eq!(sections[9]["anchors"][0], "phase-1-foundation");
}

#[test]
fn cli_rejects_a_bad_url() {
    folio()
        .args(["render", "--url", "not a url"])
        .write_stdin("## A\n")
        .assert()
        .code(2);
}

#[test]
fn cli_rejects_unknown_flags() {
    folio().args(["render", "--bogus"]).assert().code(2);
}

#[test]
fn cli_set_overrides_config_keys() {
    let output = folio()
        .args([
            "render",
            "--set",
            "deepLink.delayMs=120",
            "--set",
            "document.url=https://example.com/paper",
        ])
        .write_stdin("## Hello\n")
        .output()
        .expect("run folio");
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).expect("utf8");
    assert!(html.contains(r#""deepLinkDelayMs":120"#));
}

#[test]
fn cli_rejects_a_malformed_set() {
    folio()
        .args(["render", "--set", "deepLink.delayMs"])
        .write_stdin("## A\n")
        .assert()
        .code(2);
    folio()
        .args(["render", "--set", "deepLink..delayMs=1"])
        .write_stdin("## A\n")
        .assert()
        .code(2);
}
