//! Network responses observed by a page, with deadline-bounded waits.
//!
//! The browser feeds every `Network.responseReceived` event into a
//! [`ResponseLog`]. Callers take a [`ResponseLog::mark`] before triggering an
//! action and then wait for a matching response recorded after that mark, so
//! a response that arrives before the wait starts is never missed.

use crate::error::WaitTimeout;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

/// A single response seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedResponse {
    pub url: String,
    pub status: u16,
}

impl ObservedResponse {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self { url: url.into(), status }
    }
}

/// Which responses a wait is interested in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePattern {
    /// URL equal to the given one. `None` status accepts any.
    Exact { url: String, status: Option<u16> },
    /// URL containing the fragment.
    Contains { fragment: String, status: Option<u16> },
}

impl ResponsePattern {
    pub fn exact(url: impl Into<String>) -> Self {
        Self::Exact { url: url.into(), status: None }
    }

    pub fn contains(fragment: impl Into<String>) -> Self {
        Self::Contains { fragment: fragment.into(), status: None }
    }

    /// Restricts the pattern to one status code.
    pub fn with_status(self, code: u16) -> Self {
        match self {
            Self::Exact { url, .. } => Self::Exact { url, status: Some(code) },
            Self::Contains { fragment, .. } => Self::Contains { fragment, status: Some(code) },
        }
    }

    pub fn matches(&self, response: &ObservedResponse) -> bool {
        let (url_ok, status) = match self {
            Self::Exact { url, status } => (response.url == *url, status),
            Self::Contains { fragment, status } => (response.url.contains(fragment.as_str()), status),
        };
        url_ok && status.map_or(true, |s| s == response.status)
    }
}

impl fmt::Display for ResponsePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Exact { url, status } => {
                write!(f, "response {}", url)?;
                status
            }
            Self::Contains { fragment, status } => {
                write!(f, "response *{}*", fragment)?;
                status
            }
        };
        if let Some(code) = status {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

/// Append-only record of responses with wakeups for waiters.
#[derive(Debug, Default)]
pub struct ResponseLog {
    entries: Mutex<Vec<ObservedResponse>>,
    notify: Notify,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<ObservedResponse>> {
        // Entries are plain data; a poisoned lock still holds a valid Vec.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, response: ObservedResponse) {
        self.entries().push(response);
        self.notify.notify_waiters();
    }

    /// Position to wait from; only responses recorded afterwards are considered.
    pub fn mark(&self) -> usize {
        self.entries().len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// First response at or after `since` matching the pattern.
    pub fn find_since(&self, pattern: &ResponsePattern, since: usize) -> Option<ObservedResponse> {
        self.entries().iter().skip(since).find(|r| pattern.matches(r)).cloned()
    }

    /// Waits until a matching response is recorded after `since`.
    pub async fn wait_for(
        &self,
        pattern: &ResponsePattern,
        since: usize,
        timeout: Duration,
    ) -> Result<ObservedResponse, WaitTimeout> {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                tokio::pin!(notified);
                // Register before checking so a record between the check and
                // the await still wakes us.
                notified.as_mut().enable();

                if let Some(found) = self.find_since(pattern, since) {
                    return found;
                }
                notified.await;
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| WaitTimeout::new(pattern.to_string(), timeout))
    }
}
