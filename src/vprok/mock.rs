//! Scriptable [`PageDriver`] for unit tests.

use crate::error::WaitTimeout;
use crate::vprok::browser::PageDriver;
use crate::vprok::responses::{ObservedResponse, ResponseLog};
use crate::vprok::selectors::region;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MockPage {
    html: String,
    texts: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    present: HashSet<String>,
    goto_responses: Vec<ObservedResponse>,
    fail_goto: bool,
    confirm_region_clicks: bool,
    actions: Mutex<Vec<String>>,
    log: ResponseLog,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self.present.insert(selector.to_string());
        self
    }

    pub fn with_list(mut self, selector: &str, labels: &[&str]) -> Self {
        self.lists.insert(selector.to_string(), labels.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn with_failing(mut self, selector: &str) -> Self {
        self.failing.insert(selector.to_string());
        self
    }

    pub fn with_present(mut self, selector: &str) -> Self {
        self.present.insert(selector.to_string());
        self
    }

    /// Response recorded while `goto` runs.
    pub fn with_goto_response(mut self, url: &str, status: u16) -> Self {
        self.goto_responses.push(ObservedResponse::new(url, status));
        self
    }

    pub fn failing_goto(mut self) -> Self {
        self.fail_goto = true;
        self
    }

    /// Clicking a region-list entry answers with `/regionList` 200.
    pub fn confirming_region_clicks(mut self) -> Self {
        self.confirm_region_clicks = true;
        self
    }

    /// Navigation, clicks, waits and screenshots in call order.
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn act(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.act(format!("goto {}", url));
        if self.fail_goto {
            anyhow::bail!("net::ERR_NAME_NOT_RESOLVED");
        }
        for response in &self.goto_responses {
            self.log.record(response.clone());
        }
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        if self.failing.contains(selector) {
            return Err(anyhow!("evaluation failed for {}", selector));
        }
        Ok(self.texts.get(selector).cloned())
    }

    async fn all_text(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self.lists.get(selector).cloned().unwrap_or_default())
    }

    async fn click(&self, selector: &str, index: usize) -> Result<()> {
        self.act(format!("click {} #{}", selector, index));
        if self.failing.contains(selector) {
            anyhow::bail!("element not clickable: {}", selector);
        }
        if selector == region::LIST_ENTRY && self.confirm_region_clicks {
            self.log.record(ObservedResponse::new("https://www.vprok.ru/web/api/v1/regionList", 200));
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), WaitTimeout> {
        self.act(format!("wait {}", selector));
        if self.present.contains(selector) || self.lists.contains_key(selector) {
            Ok(())
        } else {
            Err(WaitTimeout::new(format!("selector {}", selector), timeout))
        }
    }

    async fn screenshot(&self, path: &Path, quality: u8) -> Result<()> {
        self.act(format!("screenshot q{}", quality));
        std::fs::write(path, b"\xFF\xD8\xFF\xD9")?;
        Ok(())
    }

    fn responses(&self) -> &ResponseLog {
        &self.log
    }
}
