//! Mock stop source for tests and offline development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::StopCode;

use super::StopSource;
use super::error::UpstreamError;

/// In-memory stop source serving canned HTML fixtures.
///
/// Counts fetches and can be switched into a failing state, which is what
/// the refresh controller tests need to observe single-flight and
/// gap-enforcement behavior.
#[derive(Debug, Default)]
pub struct MockStopSource {
    pages: Mutex<HashMap<StopCode, String>>,
    delay: Duration,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockStopSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture page for a stop.
    pub fn with_page(self, stop: StopCode, html: impl Into<String>) -> Self {
        self.set_page(stop, html);
        self
    }

    /// Make every fetch take this long (virtual time under a paused clock).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Register or replace a fixture page.
    pub fn set_page(&self, stop: StopCode, html: impl Into<String>) {
        self.pages
            .lock()
            .expect("mock pages lock")
            .insert(stop, html.into());
    }

    /// Toggle the failing state. While failing, every fetch returns a 503.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StopSource for MockStopSource {
    async fn stop_html(&self, stop: &StopCode) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status { status: 503 });
        }

        self.pages
            .lock()
            .expect("mock pages lock")
            .get(stop)
            .cloned()
            .ok_or_else(|| UpstreamError::NoData {
                stop: stop.to_string(),
            })
    }
}
