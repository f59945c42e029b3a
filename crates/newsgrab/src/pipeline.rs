// ABOUTME: Orchestrates one extraction run: acquire a document, run the cascade, write outputs.
// ABOUTME: Optionally hands the saved HTML to the publisher-specific binary with a bounded wait.

//! Extraction pipeline.
//!
//! [`run`] is what both binaries' callers see: it turns an [`Input`] into an
//! [`ExtractionResult`], writes `news.txt` and `site.html` when text was
//! found, and in publisher mode lets `wp-extract` overwrite `news.txt`.
//!
//! Only session setup and unreadable input files are fatal. Navigation,
//! timeout and capture failures after the session is up are logged and
//! produce an empty result, which callers treat as a failed extraction.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info, warn};
use url::Url;

use crate::dom::{Document, StaticDocument};
use crate::error::{ExtractError, Result};
use crate::extractors::cascade::select_best_content;
use crate::options::{Options, HTML_OUTPUT, PUBLISHER_BINARY};
use crate::result::ExtractionResult;
use crate::session::BrowserSession;

/// Where the page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Load the URL in a browser session.
    Url(String),
    /// Read a saved page from disk.
    HtmlFile(PathBuf),
}

/// Runs the cascade over an already loaded document.
pub async fn extract_from_document<D: Document>(doc: &D) -> ExtractionResult {
    let candidate = select_best_content(doc).await;
    ExtractionResult::from_candidate(doc.source(), candidate)
}

/// Loads `url` in a browser session and extracts the article.
///
/// Returns `Err` only when the URL is malformed or the session cannot be
/// opened. The session is closed before returning in every other case.
pub async fn extract_url(url: &str, opts: &Options) -> Result<ExtractionResult> {
    Url::parse(url).map_err(|e| ExtractError::invalid_url(url, "parse", Some(e.into())))?;

    let session = BrowserSession::open(opts).await?;

    match session.load(url).await {
        Ok(page) => {
            let result = extract_from_document(&page).await;
            session.close(Some(page)).await;
            Ok(result)
        }
        Err(e) => {
            if e.is_timeout() {
                error!(%url, timeout = ?opts.page_load_timeout, "Page load timed out");
            } else {
                error!(error = %e, "Error during extraction");
            }
            session.close(None).await;
            Ok(ExtractionResult::default())
        }
    }
}

/// Extracts the article from a saved HTML file.
pub async fn extract_html_file(path: &Path) -> Result<ExtractionResult> {
    let html = std::fs::read_to_string(path)
        .map_err(|e| ExtractError::io(path.display().to_string(), "read html", e))?;
    let doc = StaticDocument::parse(html);
    Ok(extract_from_document(&doc).await)
}

/// Writes the article text and then the full page HTML into the output directory.
pub fn write_outputs(result: &ExtractionResult, opts: &Options) -> Result<()> {
    let text_path = opts.text_path();
    std::fs::write(&text_path, &result.text)
        .map_err(|e| ExtractError::io(text_path.display().to_string(), "write", e))?;
    info!(
        path = %text_path.display(),
        chars = result.text.chars().count(),
        "Saved article text"
    );

    let html_path = opts.html_path();
    std::fs::write(&html_path, &result.full_html)
        .map_err(|e| ExtractError::io(html_path.display().to_string(), "write", e))?;
    info!(
        path = %html_path.display(),
        chars = result.full_html.chars().count(),
        "Saved full HTML"
    );

    Ok(())
}

/// Path of the publisher binary installed next to the running executable.
pub fn publisher_binary() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| ExtractError::io(PUBLISHER_BINARY, "locate", e))?;
    Ok(exe.with_file_name(format!(
        "{}{}",
        PUBLISHER_BINARY,
        std::env::consts::EXE_SUFFIX
    )))
}

/// Runs `wp-extract site.html` inside the output directory.
///
/// The child is killed if it outlives `opts.publisher_timeout`. A non-zero
/// exit status is reported as a `Subprocess` error.
pub async fn run_publisher_step(binary: &Path, opts: &Options) -> Result<()> {
    let target = binary.display().to_string();
    info!(binary = %target, "Running publisher-specific extractor");

    let child = Command::new(binary)
        .arg(HTML_OUTPUT)
        .current_dir(&opts.output_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match timeout(opts.publisher_timeout, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(ExtractError::subprocess(target, "spawn", Some(e.into()))),
        Err(_) => {
            return Err(ExtractError::subprocess(
                target,
                "wait",
                Some(anyhow::anyhow!(
                    "no exit within {:?}",
                    opts.publisher_timeout
                )),
            ))
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        info!(output = %stdout.trim(), "publisher extractor finished");
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::subprocess(
            target,
            "exit",
            Some(anyhow::anyhow!("{}: {}", output.status, stderr.trim())),
        ));
    }

    Ok(())
}

/// Runs one full extraction.
///
/// An empty result is returned as `Ok` with nothing written; the caller
/// decides the exit status. Publisher step failures are logged only.
pub async fn run(input: &Input, opts: &Options) -> Result<ExtractionResult> {
    let result = match input {
        Input::Url(url) => {
            info!(%url, mode = %opts.mode, "Extracting article");
            extract_url(url, opts).await?
        }
        Input::HtmlFile(path) => {
            info!(path = %path.display(), "Extracting article from saved page");
            extract_html_file(path).await?
        }
    };

    if result.is_empty() {
        error!("Failed to extract article text.");
        return Ok(result);
    }
    if let Some(rule) = &result.rule {
        info!(%rule, chars = result.text.chars().count(), "Extracted article text");
    }

    write_outputs(&result, opts)?;

    if opts.publisher_mode {
        let step = match publisher_binary() {
            Ok(binary) => run_publisher_step(&binary, opts).await,
            Err(e) => Err(e),
        };
        if let Err(e) = step {
            warn!(error = %e, "Publisher-specific extraction failed");
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::SourceRule;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn article_page(len: usize) -> String {
        format!(
            "<html><head><title>x</title></head><body><nav>Menu</nav><article>{}</article></body></html>",
            "word ".repeat(len / 5)
        )
    }

    fn opts_in(dir: &TempDir) -> Options {
        Options::builder().output_dir(dir.path()).build()
    }

    #[tokio::test]
    async fn extract_from_document_keeps_full_source() {
        let html = article_page(400);
        let doc = StaticDocument::parse(html.clone());
        let result = extract_from_document(&doc).await;
        assert_eq!(result.full_html, html);
        assert_eq!(result.rule, Some(SourceRule::ArticleTag));
        assert_eq!(result.text, "word ".repeat(80).trim());
    }

    #[tokio::test]
    async fn html_file_run_writes_both_outputs() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("saved.html");
        let html = article_page(400);
        std::fs::write(&page, &html).unwrap();

        let opts = opts_in(&dir);
        let result = run(&Input::HtmlFile(page), &opts).await.unwrap();

        assert!(!result.is_empty());
        assert_eq!(std::fs::read_to_string(opts.text_path()).unwrap(), result.text);
        assert_eq!(std::fs::read_to_string(opts.html_path()).unwrap(), html);
    }

    #[tokio::test]
    async fn empty_extraction_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("saved.html");
        std::fs::write(&page, "<html><body><p>tiny</p></body></html>").unwrap();

        let opts = opts_in(&dir);
        let result = run(&Input::HtmlFile(page), &opts).await.unwrap();

        assert!(result.is_empty());
        assert!(!opts.text_path().exists());
        assert!(!opts.html_path().exists());
    }

    #[tokio::test]
    async fn missing_html_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = run(&Input::HtmlFile(dir.path().join("nope.html")), &opts_in(&dir))
            .await
            .unwrap_err();
        assert!(err.is_io());
    }

    #[tokio::test]
    async fn malformed_url_fails_before_any_session() {
        let dir = TempDir::new().unwrap();
        let err = run(&Input::Url("not a url".to_string()), &opts_in(&dir))
            .await
            .unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn attach_without_browser_is_a_session_error() {
        let dir = TempDir::new().unwrap();
        // Bind and drop to find a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let opts = Options::builder()
            .use_existing_session(true)
            .debug_port(port)
            .output_dir(dir.path())
            .build();

        let err = extract_url("https://example.com/story", &opts)
            .await
            .unwrap_err();
        assert!(err.is_session());
    }

    #[tokio::test]
    async fn missing_publisher_binary_is_subprocess_error() {
        let dir = TempDir::new().unwrap();
        let err = run_publisher_step(&dir.path().join("no-such-binary"), &opts_in(&dir))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Subprocess);
        assert_eq!(err.op, "spawn");
    }

    #[tokio::test]
    async fn publisher_failure_does_not_fail_the_run() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("saved.html");
        std::fs::write(&page, article_page(400)).unwrap();

        // No wp-extract sits next to the unit test binary, so the step fails and is only logged.
        let opts = Options::builder()
            .output_dir(dir.path())
            .publisher_mode(true)
            .build();
        let result = run(&Input::HtmlFile(page), &opts).await.unwrap();
        assert!(!result.is_empty());
        assert!(opts.text_path().exists());
    }
}
