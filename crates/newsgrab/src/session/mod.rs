// ABOUTME: Browser session manager built on chromiumoxide: launch or attach, load one page, close.
// ABOUTME: LoadedPage exposes the rendered tab through the Document trait for the content cascade.

//! Browser automation over the Chrome DevTools Protocol.
//!
//! A [`BrowserSession`] is either launched (headless Chrome owned by this run)
//! or attached to a browser the user already started with remote debugging.
//! [`BrowserSession::load`] opens a fresh tab, hides the webdriver flag,
//! navigates with a deadline, waits for the page to settle and captures the
//! full HTML. The returned [`LoadedPage`] answers selector queries by
//! evaluating `querySelectorAll` in the tab.
//!
//! The CDP handler stream is pumped on a spawned task for as long as the
//! session lives. [`BrowserSession::close`] stops it.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::dom::{Document, ElementSnapshot};
use crate::error::{ExtractError, Result};
use crate::options::{Options, SessionMode};

pub mod cdp_probe;

/// Delay between element queries while waiting for a selector to match.
const FIND_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Registered on every new document so `navigator.webdriver` reads as undefined.
const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Chrome switches for launched sessions. The user agent is appended separately.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-blink-features=AutomationControlled",
    "--disable-extensions",
    "--disable-plugins",
    "--disable-images",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--disable-features=TranslateUI,VizDisplayCompositor",
    "--disable-ipc-flooding-protection",
    "--disable-default-apps",
    "--disable-sync",
    "--disable-translate",
    "--disable-web-security",
];

/// chromiumoxide's default switches minus `--enable-automation`.
///
/// The builder's own defaults are turned off, so these are passed explicitly.
const RETAINED_DEFAULT_ARGS: &[&str] = &[
    "--disable-background-networking",
    "--enable-features=NetworkService,NetworkServiceInProcess",
    "--disable-breakpad",
    "--disable-client-side-phishing-detection",
    "--disable-component-extensions-with-background-pages",
    "--disable-hang-monitor",
    "--disable-popup-blocking",
    "--disable-prompt-on-repost",
    "--force-color-profile=srgb",
    "--metrics-recording-only",
    "--no-first-run",
    "--password-store=basic",
    "--use-mock-keychain",
];

/// Switch that must never reach a launched browser.
const EXCLUDED_SWITCH: &str = "--enable-automation";

/// Full switch list for a launched browser.
fn launch_args(user_agent: &str) -> Vec<String> {
    LAUNCH_ARGS
        .iter()
        .chain(RETAINED_DEFAULT_ARGS)
        .filter(|a| **a != EXCLUDED_SWITCH)
        .map(|a| a.to_string())
        .chain(std::iter::once(format!("--user-agent={}", user_agent)))
        .collect()
}

/// A live browser connection plus the task pumping its CDP events.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    mode: SessionMode,
    page_load_timeout: Duration,
    element_wait: Duration,
    settle_delay: Duration,
}

impl BrowserSession {
    /// Launches or attaches according to `opts.mode`.
    pub async fn open(opts: &Options) -> Result<Self> {
        match opts.mode {
            SessionMode::Launch => Self::launch(opts).await,
            SessionMode::Attach => Self::attach(opts).await,
        }
    }

    /// Starts a headless browser owned by this session.
    pub async fn launch(opts: &Options) -> Result<Self> {
        let config = BrowserConfig::builder()
            .disable_default_args()
            .no_sandbox()
            .request_timeout(opts.page_load_timeout)
            .args(launch_args(&opts.user_agent))
            .build()
            .map_err(|e| ExtractError::session("chrome", "configure", Some(anyhow::anyhow!(e))))?;

        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| ExtractError::session("chrome", "launch", Some(e.into())))?;
        info!("Launched headless browser");

        Ok(Self::from_parts(browser, handler, SessionMode::Launch, opts))
    }

    /// Connects to a browser listening on `opts.debug_port`.
    pub async fn attach(opts: &Options) -> Result<Self> {
        let info = cdp_probe::fetch_cdp_endpoint(opts.debug_port).await?;
        debug!(browser = ?info.browser, ws = %info.web_socket_debugger_url, "found debug endpoint");

        let (browser, handler) = Browser::connect(info.web_socket_debugger_url.as_str())
            .await
            .map_err(|e| {
                ExtractError::session(info.web_socket_debugger_url.clone(), "connect", Some(e.into()))
            })?;
        info!(port = opts.debug_port, "Attached to existing browser session");

        Ok(Self::from_parts(browser, handler, SessionMode::Attach, opts))
    }

    fn from_parts(
        browser: Browser,
        mut handler: chromiumoxide::Handler,
        mode: SessionMode,
        opts: &Options,
    ) -> Self {
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "cdp handler event failed");
                }
            }
        });

        Self {
            browser,
            handler,
            mode,
            page_load_timeout: opts.page_load_timeout,
            element_wait: opts.element_wait,
            settle_delay: opts.settle_delay,
        }
    }

    /// Opens a new tab, navigates to `url` and captures the rendered HTML.
    pub async fn load(&self, url: &str) -> Result<LoadedPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExtractError::session(url, "open tab", Some(e.into())))?;

        if let Err(e) = page
            .evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
                HIDE_WEBDRIVER_SCRIPT,
            ))
            .await
        {
            warn!(error = %e, "could not register webdriver override");
        }

        let navigation = timeout(self.page_load_timeout, page.goto(url))
            .await
            .map(|loaded| loaded.map(|_| ()));
        match navigation {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                close_page(page).await;
                return Err(ExtractError::navigation(url, "load", Some(e.into())));
            }
            Err(_) => {
                close_page(page).await;
                return Err(ExtractError::timeout(
                    url,
                    "load",
                    Some(anyhow::anyhow!(
                        "page did not load within {:?}",
                        self.page_load_timeout
                    )),
                ));
            }
        }

        sleep(self.settle_delay).await;

        let source = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                close_page(page).await;
                return Err(ExtractError::navigation(url, "capture html", Some(e.into())));
            }
        };
        debug!(chars = source.chars().count(), "captured page source");

        Ok(LoadedPage {
            page,
            source,
            element_wait: self.element_wait,
        })
    }

    /// Releases the session.
    ///
    /// A launched browser is shut down and reaped. An attached browser keeps
    /// running; only `page`, the tab this session opened, is closed.
    pub async fn close(mut self, page: Option<LoadedPage>) {
        match self.mode {
            SessionMode::Launch => {
                if let Err(e) = self.browser.close().await {
                    warn!(error = %e, "browser close failed");
                }
                if let Err(e) = self.browser.wait().await {
                    warn!(error = %e, "browser process wait failed");
                }
            }
            SessionMode::Attach => {
                if let Some(page) = page {
                    close_page(page.page).await;
                }
            }
        }
        self.handler.abort();
        debug!(mode = %self.mode, "browser session closed");
    }
}

async fn close_page(page: Page) {
    if let Err(e) = page.close().await {
        debug!(error = %e, "tab close failed");
    }
}

/// A tab that finished loading, plus the HTML captured after the settle delay.
pub struct LoadedPage {
    page: Page,
    source: String,
    element_wait: Duration,
}

impl LoadedPage {
    async fn query(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let literal = serde_json::to_string(selector)
            .map_err(|e| ExtractError::inspect(selector, "encode selector", Some(e.into())))?;
        let script = format!(
            "Array.from(document.querySelectorAll({})).map(el => ({{ text: el.innerText || '', html: el.outerHTML }}))",
            literal
        );

        self.page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ExtractError::inspect(selector, "querySelectorAll", Some(e.into())))?
            .into_value::<Vec<ElementSnapshot>>()
            .map_err(|e| ExtractError::inspect(selector, "read elements", Some(e.into())))
    }
}

impl Document for LoadedPage {
    fn source(&self) -> &str {
        &self.source
    }

    /// Polls until at least one element matches or the element wait elapses.
    async fn find_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let deadline = Instant::now() + self.element_wait;
        loop {
            let found = self.query(selector).await?;
            if !found.is_empty() || Instant::now() >= deadline {
                return Ok(found);
            }
            sleep(FIND_POLL_INTERVAL).await;
        }
    }
}
