//! Refresh scheduling for a stop's arrival board.
//!
//! One [`RefreshController`] per stop decides, for each refresh request
//! (manual or timer-driven), whether to actually hit the upstream tracker:
//!
//! - at most one fetch is ever outstanding; concurrent callers join the
//!   in-flight operation and share its outcome (single-flight),
//! - requests inside the minimum inter-request gap are dropped silently,
//! - an automatic tick fires at a fixed interval, but only while the UI
//!   reports itself visible.
//!
//! Transport failures leave the previous snapshot in place so the board
//! degrades instead of going blank, and they never stop the timer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::Shared;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{StopCode, StopSnapshot};
use crate::extract::extract;
use crate::upstream::{StopSource, UpstreamError};

/// Outcome shared between every caller that joined one fetch.
type FetchResult = Result<Arc<StopSnapshot>, Arc<UpstreamError>>;

/// The single in-flight operation, cloneable so late callers can join it.
type SharedFetch = Shared<Pin<Box<dyn Future<Output = FetchResult> + Send>>>;

/// Timing configuration for a controller.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Minimum gap between issued fetches. Requests inside the gap are
    /// dropped, not queued.
    pub min_gap: Duration,

    /// Interval of the automatic refresh tick.
    pub auto_interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            min_gap: Duration::from_secs(5),
            auto_interval: Duration::from_secs(30),
        }
    }
}

impl RefreshConfig {
    /// Set the minimum inter-request gap.
    pub fn with_min_gap(mut self, gap: Duration) -> Self {
        self.min_gap = gap;
        self
    }

    /// Set the automatic refresh interval.
    pub fn with_auto_interval(mut self, interval: Duration) -> Self {
        self.auto_interval = interval;
        self
    }
}

/// Shared flag reporting whether the UI is currently visible.
///
/// The web layer sets it from the browser's page-visibility events; the
/// auto-refresh task consults it before each tick. Starts visible.
#[derive(Debug, Clone)]
pub struct VisibilitySignal(Arc<AtomicBool>);

impl Default for VisibilitySignal {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl VisibilitySignal {
    /// Create a signal in the visible state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visibility change.
    pub fn set_visible(&self, visible: bool) {
        self.0.store(visible, Ordering::SeqCst);
    }

    /// Whether the UI currently reports itself visible.
    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one refresh request.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// A fetch ran (or was joined) and produced a fresh snapshot.
    Refreshed(Arc<StopSnapshot>),

    /// The request fell inside the minimum gap and was dropped; the
    /// retained snapshot, if any, is returned unchanged.
    Cooling { snapshot: Option<Arc<StopSnapshot>> },

    /// The fetch failed; the previous snapshot is retained.
    Failed(String),
}

/// Mutable controller state. All transitions happen under one lock.
#[derive(Default)]
struct RefreshState {
    /// When the last fetch was issued.
    last_issued_at: Option<Instant>,

    /// Earliest instant the next fetch may be issued.
    next_allowed_at: Option<Instant>,

    /// The outstanding fetch, if any. `Some` is the InFlight state.
    in_flight: Option<SharedFetch>,

    /// Most recent successful snapshot, retained across failures.
    latest: Option<Arc<StopSnapshot>>,

    /// Message from the most recent failed fetch, cleared on success.
    last_error: Option<String>,
}

/// Refresh policy for one stop.
pub struct RefreshController {
    stop: StopCode,
    config: RefreshConfig,
    source: Arc<dyn StopSource>,
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshController {
    /// Create a controller for a stop.
    pub fn new(stop: StopCode, source: Arc<dyn StopSource>, config: RefreshConfig) -> Self {
        Self {
            stop,
            config,
            source,
            state: Arc::new(Mutex::new(RefreshState::default())),
        }
    }

    /// The stop this controller refreshes.
    pub fn stop(&self) -> &StopCode {
        &self.stop
    }

    /// Request a refresh.
    ///
    /// While a fetch is in flight, joins it and shares its outcome. Inside
    /// the minimum gap, drops the request. Otherwise issues a new fetch,
    /// extracts the snapshot, and records it (or the failure) before
    /// returning to idle.
    pub async fn request_refresh(&self) -> RefreshOutcome {
        let fetch = {
            let mut state = self.state.lock().await;

            if let Some(in_flight) = &state.in_flight {
                in_flight.clone()
            } else {
                let now = Instant::now();
                if state.next_allowed_at.is_some_and(|at| now < at) {
                    return RefreshOutcome::Cooling {
                        snapshot: state.latest.clone(),
                    };
                }

                state.last_issued_at = Some(now);
                state.next_allowed_at = Some(now + self.config.min_gap);

                let fetch = self.start_fetch();
                state.in_flight = Some(fetch.clone());
                fetch
            }
        };

        match fetch.await {
            Ok(snapshot) => RefreshOutcome::Refreshed(snapshot),
            Err(e) => RefreshOutcome::Failed(e.to_string()),
        }
    }

    /// Build the shared fetch future. The future itself clears the
    /// in-flight slot and records the snapshot or error when it completes,
    /// so late joiners and the issuing caller see the same transition.
    fn start_fetch(&self) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let stop = self.stop.clone();

        async move {
            debug!(stop = %stop, "fetching arrivals");
            let result: FetchResult = match source.stop_html(&stop).await {
                Ok(html) => Ok(Arc::new(extract(&html))),
                Err(e) => Err(Arc::new(e)),
            };

            let mut state = state.lock().await;
            state.in_flight = None;
            match &result {
                Ok(snapshot) => {
                    debug!(stop = %stop, routes = snapshot.routes.len(), "refreshed");
                    state.latest = Some(Arc::clone(snapshot));
                    state.last_error = None;
                }
                Err(e) => {
                    warn!(stop = %stop, error = %e, "refresh failed");
                    state.last_error = Some(e.to_string());
                }
            }

            result
        }
        .boxed()
        .shared()
    }

    /// When the most recent fetch was issued, if any.
    pub async fn last_refresh_issued_at(&self) -> Option<Instant> {
        self.state.lock().await.last_issued_at
    }

    /// Most recent successful snapshot, if any.
    pub async fn latest(&self) -> Option<Arc<StopSnapshot>> {
        self.state.lock().await.latest.clone()
    }

    /// Message from the most recent failed fetch, if the last fetch failed.
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// Whether a fetch is currently outstanding.
    pub async fn is_refreshing(&self) -> bool {
        self.state.lock().await.in_flight.is_some()
    }

    /// Whole seconds until the next fetch may be issued, 0 when allowed
    /// now. Derived for display only; never consulted for scheduling.
    pub async fn cooldown_seconds_remaining(&self) -> u64 {
        let state = self.state.lock().await;
        match state.next_allowed_at {
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                (remaining.as_millis().div_ceil(1000)) as u64
            }
            None => 0,
        }
    }

    /// Spawn the automatic refresh task for this controller.
    ///
    /// Ticks at the configured interval and requests a refresh on each
    /// tick, but only while `visibility` reports the UI visible. Failures
    /// are logged and do not stop the timer.
    pub fn spawn_auto_refresh(self: &Arc<Self>, visibility: VisibilitySignal) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(controller.config.auto_interval);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                if !visibility.is_visible() {
                    continue;
                }
                match controller.request_refresh().await {
                    RefreshOutcome::Refreshed(_) | RefreshOutcome::Cooling { .. } => {}
                    RefreshOutcome::Failed(e) => {
                        warn!(stop = %controller.stop, error = %e, "auto refresh failed");
                    }
                }
            }
        })
    }
}
