//! Chromium session and page driver using chromiumoxide.

use crate::config::Config;
use crate::error::WaitTimeout;
use crate::vprok::responses::{ObservedResponse, ResponseLog};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::EventResponseReceived;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::js::EvaluationResult;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const SELECTOR_POLL: Duration = Duration::from_millis(100);

/// Browser primitives the pipelines need - enables mocking for tests.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigates and waits for the load event.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Serialized DOM of the current page.
    async fn content(&self) -> Result<String>;

    /// `textContent` of the first element matching `selector`, `None` if absent.
    async fn text_content(&self, selector: &str) -> Result<Option<String>>;

    /// Visible text of every element matching `selector`, in document order.
    async fn all_text(&self, selector: &str) -> Result<Vec<String>>;

    /// Clicks the `index`-th element matching `selector`.
    async fn click(&self, selector: &str, index: usize) -> Result<()>;

    /// Waits until at least one element matches `selector`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), WaitTimeout>;

    /// Full-page JPEG screenshot written to `path`.
    async fn screenshot(&self, path: &Path, quality: u8) -> Result<()>;

    /// Responses observed since the page was opened.
    fn responses(&self) -> &ResponseLog;
}

/// How the window is set up for a run.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Fixed window size; `None` keeps Chromium's default.
    pub window: Option<(u32, u32)>,
    /// Value for `--lang`.
    pub lang: Option<String>,
}

impl LaunchOptions {
    /// Window and locale for product pages.
    pub fn product(config: &Config) -> Self {
        Self {
            window: Some((config.viewport.width, config.viewport.height)),
            lang: Some(config.lang.clone()),
        }
    }

    /// Catalog pages run with browser defaults.
    pub fn catalog() -> Self {
        Self::default()
    }
}

/// A launched Chromium process plus its CDP handler task.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches Chromium according to the configuration.
    pub async fn launch(config: &Config, options: &LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .viewport(None);

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if let Some((width, height)) = options.window {
            builder = builder.window_size(width, height);
        }
        if let Some(lang) = &options.lang {
            builder = builder.arg(format!("--lang={}", lang));
        }

        let browser_config =
            builder.build().map_err(|e| anyhow!("failed to build browser config: {e}"))?;

        debug!("Launching Chromium (headless: {})", config.headless);
        let (browser, mut handler) =
            Browser::launch(browser_config).await.context("Failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Opens a blank page that records network responses from the start.
    pub async fn open_page(&self) -> Result<ChromePage> {
        let page = self.browser.new_page("about:blank").await.context("Failed to open page")?;
        ChromePage::attach(page).await
    }

    /// Closes the browser. Failures are logged, never returned.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process wait failed: {}", e);
        }
        self.handler.abort();
    }
}

/// A Chromium tab implementing [`PageDriver`].
pub struct ChromePage {
    page: Page,
    responses: Arc<ResponseLog>,
    listener: JoinHandle<()>,
}

impl ChromePage {
    async fn attach(page: Page) -> Result<Self> {
        let mut events = page
            .event_listener::<EventResponseReceived>()
            .await
            .context("Failed to subscribe to network responses")?;

        let responses = Arc::new(ResponseLog::new());
        let log = Arc::clone(&responses);
        let listener = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let status = u16::try_from(event.response.status).unwrap_or(0);
                log.record(ObservedResponse::new(event.response.url.clone(), status));
            }
        });

        Ok(Self { page, responses, listener })
    }

    async fn evaluate(&self, script: String) -> Result<EvaluationResult> {
        self.page.evaluate(script).await.context("JS evaluation failed")
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Text from an evaluation that may yield `null`.
///
/// CDP omits `value` for a JS `null`, so both a missing value and an explicit
/// null mean the element was absent.
fn optional_text(result: &EvaluationResult) -> Result<Option<String>> {
    match result.value() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(anyhow!("expected text from page, got {}", other)),
    }
}

/// Quotes a selector as a JS string literal.
fn js_string(selector: &str) -> Result<String> {
    serde_json::to_string(selector).context("Failed to encode selector")
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        debug!("GOTO {}", url);
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(anyhow!("navigation to {} failed: {}", url, e)),
            Err(_) => Err(WaitTimeout::new(format!("page load {}", url), timeout).into()),
        }
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.context("Failed to read page content")
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? (el.textContent || '') : null; }})()",
            js_string(selector)?
        );
        optional_text(&self.evaluate(script).await?)
    }

    async fn all_text(&self, selector: &str) -> Result<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({})).map(e => e.innerText || e.textContent || '')",
            js_string(selector)?
        );
        self.evaluate(script)
            .await?
            .into_value()
            .map_err(|e| anyhow!("failed to convert JS result: {e:?}"))
    }

    async fn click(&self, selector: &str, index: usize) -> Result<()> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("Failed to query {}", selector))?;
        let element = elements
            .get(index)
            .ok_or_else(|| anyhow!("no element #{} for {}", index, selector))?;
        element.click().await.with_context(|| format!("Failed to click {}", selector))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), WaitTimeout> {
        let poll = async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        };
        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| WaitTimeout::new(format!("selector {}", selector), timeout))
    }

    async fn screenshot(&self, path: &Path, quality: u8) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Jpeg)
            .quality(i64::from(quality))
            .full_page(true)
            .build();

        self.page
            .save_screenshot(params, path)
            .await
            .with_context(|| format!("Failed to save screenshot to {}", path.display()))?;
        Ok(())
    }

    fn responses(&self) -> &ResponseLog {
        &self.responses
    }
}
