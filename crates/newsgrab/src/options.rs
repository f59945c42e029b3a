// ABOUTME: Configuration options for newsgrab runs including SessionMode, Options and OptionsBuilder.
// ABOUTME: OptionsBuilder provides a fluent API whose defaults are the fixed timeouts and file names.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the plain-text output file.
pub const TEXT_OUTPUT: &str = "news.txt";

/// Name of the raw HTML output file.
pub const HTML_OUTPUT: &str = "site.html";

/// Name of the publisher-specific extractor binary.
pub const PUBLISHER_BINARY: &str = "wp-extract";

/// Port an already-running Chrome is expected to listen on for remote debugging.
pub const DEFAULT_DEBUG_PORT: u16 = 9222;

/// Desktop Chrome user agent presented by launched sessions.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How the browser session is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Spawn a headless browser owned by this run.
    #[default]
    Launch,
    /// Attach to a browser already listening on the debug port.
    Attach,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionMode::Launch => "launch",
            SessionMode::Attach => "attach",
        };
        write!(f, "{}", s)
    }
}

/// Configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct Options {
    pub mode: SessionMode,
    pub debug_port: u16,
    pub user_agent: String,
    pub page_load_timeout: Duration,
    pub element_wait: Duration,
    pub settle_delay: Duration,
    pub output_dir: PathBuf,
    pub publisher_mode: bool,
    pub publisher_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: SessionMode::Launch,
            debug_port: DEFAULT_DEBUG_PORT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_load_timeout: Duration::from_secs(10),
            element_wait: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
            output_dir: PathBuf::from("."),
            publisher_mode: false,
            publisher_timeout: Duration::from_secs(30),
        }
    }
}

impl Options {
    /// Start building options from the defaults.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// Path of the text output file.
    pub fn text_path(&self) -> PathBuf {
        self.output_dir.join(TEXT_OUTPUT)
    }

    /// Path of the HTML output file.
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(HTML_OUTPUT)
    }

    /// Whether this run owns the browser process and must shut it down.
    pub fn owns_browser(&self) -> bool {
        self.mode == SessionMode::Launch
    }
}

/// Builder for constructing Options with custom settings.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    opts: Options,
}

impl OptionsBuilder {
    /// Create a new OptionsBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Attach to an existing browser instead of launching one.
    pub fn use_existing_session(mut self, attach: bool) -> Self {
        self.opts.mode = if attach {
            SessionMode::Attach
        } else {
            SessionMode::Launch
        };
        self
    }

    /// Set the remote debugging port used in attach mode.
    pub fn debug_port(mut self, port: u16) -> Self {
        self.opts.debug_port = port;
        self
    }

    /// Set the User-Agent presented by launched browsers.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the page load deadline.
    pub fn page_load_timeout(mut self, timeout: Duration) -> Self {
        self.opts.page_load_timeout = timeout;
        self
    }

    /// Set how long an empty element query keeps polling.
    pub fn element_wait(mut self, wait: Duration) -> Self {
        self.opts.element_wait = wait;
        self
    }

    /// Set the fixed delay between page load and HTML capture.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.opts.settle_delay = delay;
        self
    }

    /// Set the directory the output files are written to.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.output_dir = dir.into();
        self
    }

    /// Run the publisher-specific extractor after the generic one.
    pub fn publisher_mode(mut self, enabled: bool) -> Self {
        self.opts.publisher_mode = enabled;
        self
    }

    /// Set the wait bound for the publisher subprocess.
    pub fn publisher_timeout(mut self, timeout: Duration) -> Self {
        self.opts.publisher_timeout = timeout;
        self
    }

    /// Build the Options.
    pub fn build(self) -> Options {
        self.opts
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_constants() {
        let opts = Options::default();
        assert_eq!(opts.mode, SessionMode::Launch);
        assert_eq!(opts.debug_port, 9222);
        assert_eq!(opts.page_load_timeout, Duration::from_secs(10));
        assert_eq!(opts.element_wait, Duration::from_secs(2));
        assert_eq!(opts.publisher_timeout, Duration::from_secs(30));
        assert_eq!(opts.text_path(), PathBuf::from("./news.txt"));
        assert_eq!(opts.html_path(), PathBuf::from("./site.html"));
        assert!(opts.owns_browser());
    }

    #[test]
    fn builder_overrides() {
        let opts = Options::builder()
            .use_existing_session(true)
            .debug_port(9333)
            .output_dir("/tmp/out")
            .publisher_mode(true)
            .build();
        assert_eq!(opts.mode, SessionMode::Attach);
        assert_eq!(opts.debug_port, 9333);
        assert!(!opts.owns_browser());
        assert!(opts.publisher_mode);
        assert_eq!(opts.text_path(), PathBuf::from("/tmp/out/news.txt"));
    }
}
