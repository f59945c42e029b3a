// ABOUTME: Integration tests for the newsgrab and wp-extract binaries.
// ABOUTME: Runs both CLIs against saved pages in a temp directory and checks exit codes and output files.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn newsgrab_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("newsgrab").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn wp_extract_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wp-extract").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn article_html() -> String {
    let body = "The council voted on Tuesday to extend the library hours through the winter. ".repeat(4);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Library hours</title><script>var x = 1;</script></head>
<body>
<nav><a href="/">Home</a></nav>
<article><h1>Library hours extended</h1><p>{}</p></article>
<footer>Copyright</footer>
</body>
</html>"#,
        body.trim()
    )
}

const WAPO_DUMP: &str = r#"<!DOCTYPE html>
<html><head><title>Paywalled</title></head>
<body><div class="paywall">Subscribe to read</div>
<script type="application/json">{"items":[
{"type":"text","content":"The first paragraph of the embedded story is here."},
{"type":"text","content":"It continues with a “quoted” phrase and a <a href=\/x\/>link<\/a>."},
{"type":"text","content":"tiny"}
]}</script>
</body></html>"#;

#[test]
fn html_mode_writes_text_then_html() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("saved.html");
    let html = article_html();
    fs::write(&page, &html).unwrap();

    newsgrab_cmd(&dir).arg("--html").arg(&page).assert().success();

    let text = fs::read_to_string(dir.path().join("news.txt")).unwrap();
    assert!(text.starts_with("Library hours extended"));
    assert!(text.contains("extend the library hours"));
    assert!(!text.contains("Copyright"));
    assert_eq!(fs::read_to_string(dir.path().join("site.html")).unwrap(), html);
}

#[test]
fn html_mode_without_content_exits_one() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("saved.html");
    fs::write(&page, "<html><body><p>Too short</p></body></html>").unwrap();

    newsgrab_cmd(&dir)
        .arg("--html")
        .arg(&page)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to extract article text."));

    assert!(!dir.path().join("news.txt").exists());
    assert!(!dir.path().join("site.html").exists());
}

#[test]
fn missing_url_prints_usage_and_exits_one() {
    let dir = TempDir::new().unwrap();
    newsgrab_cmd(&dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("--remote-debugging-port=9222"));
}

#[test]
fn url_and_html_together_fail() {
    let dir = TempDir::new().unwrap();
    newsgrab_cmd(&dir)
        .arg("https://example.com")
        .arg("--html")
        .arg("saved.html")
        .assert()
        .code(1);
}

#[test]
fn unknown_flag_exits_one() {
    let dir = TempDir::new().unwrap();
    newsgrab_cmd(&dir)
        .arg("https://example.com")
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn non_numeric_port_exits_one() {
    let dir = TempDir::new().unwrap();
    newsgrab_cmd(&dir)
        .arg("--port")
        .arg("abc")
        .arg("https://example.com")
        .assert()
        .code(1);
}

#[test]
fn help_exits_zero() {
    let dir = TempDir::new().unwrap();
    newsgrab_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--use-existing-session"));
}

#[test]
fn malformed_url_exits_one() {
    let dir = TempDir::new().unwrap();
    newsgrab_cmd(&dir)
        .arg("not a url")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn legacy_wp_flag_runs_publisher_extractor() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("saved.html");
    // Long enough for the cascade, and carrying embedded content for wp-extract.
    let html = WAPO_DUMP.replace(
        r#"<div class="paywall">Subscribe to read</div>"#,
        &format!(
            "<article>{}</article>",
            "Subscribe to read the rest of this story today. ".repeat(6)
        ),
    );
    fs::write(&page, &html).unwrap();

    newsgrab_cmd(&dir)
        .arg("--html")
        .arg(&page)
        .arg("-wp")
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("news.txt")).unwrap();
    assert_eq!(
        text,
        "The first paragraph of the embedded story is here.\n\n\
         It continues with a \u{201c}quoted\u{201d} phrase and a link."
    );
}

#[test]
fn wp_extract_writes_news_txt() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("site.html"), WAPO_DUMP).unwrap();

    wp_extract_cmd(&dir)
        .arg("site.html")
        .assert()
        .success()
        .stdout(predicate::str::contains("written to news.txt"));

    let text = fs::read_to_string(dir.path().join("news.txt")).unwrap();
    assert!(text.starts_with("The first paragraph"));
    assert!(!text.contains("tiny"));
}

#[test]
fn wp_extract_without_matches_reports_no_content() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("site.html"), "<html><body>No JSON here</body></html>").unwrap();

    wp_extract_cmd(&dir)
        .arg("site.html")
        .assert()
        .success()
        .stdout(predicate::str::contains("No content extracted"));

    assert!(!dir.path().join("news.txt").exists());
}

#[test]
fn wp_extract_wrong_arg_count_exits_one() {
    let dir = TempDir::new().unwrap();
    wp_extract_cmd(&dir).assert().code(1);
    wp_extract_cmd(&dir).arg("a.html").arg("b.html").assert().code(1);
}
