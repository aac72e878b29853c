//! Application state for the web layer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{RouteColors, StopCode};
use crate::refresh::{RefreshConfig, RefreshController, VisibilitySignal};
use crate::upstream::StopSource;

/// Shared application state.
///
/// Holds one refresh controller per stop, created on first use. The home
/// stop's controller additionally gets an auto-refresh task (spawned in
/// `main`); other stops refresh when their board is requested.
#[derive(Clone)]
pub struct AppState {
    /// The fixed stop shown on the index page
    pub home_stop: StopCode,

    /// Route display colors
    pub colors: Arc<RouteColors>,

    /// Board visibility reported by the browser
    pub visibility: VisibilitySignal,

    source: Arc<dyn StopSource>,
    refresh_config: RefreshConfig,
    controllers: Arc<Mutex<HashMap<StopCode, Arc<RefreshController>>>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        home_stop: StopCode,
        source: Arc<dyn StopSource>,
        refresh_config: RefreshConfig,
        colors: RouteColors,
        visibility: VisibilitySignal,
    ) -> Self {
        Self {
            home_stop,
            colors: Arc::new(colors),
            visibility,
            source,
            refresh_config,
            controllers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Automatic refresh interval in seconds, surfaced to the board script.
    pub fn auto_interval_secs(&self) -> u64 {
        self.refresh_config.auto_interval.as_secs()
    }

    /// Get the controller for a stop, creating it on first use.
    pub async fn controller_for(&self, stop: &StopCode) -> Arc<RefreshController> {
        let mut controllers = self.controllers.lock().await;
        controllers
            .entry(stop.clone())
            .or_insert_with(|| {
                Arc::new(RefreshController::new(
                    stop.clone(),
                    Arc::clone(&self.source),
                    self.refresh_config.clone(),
                ))
            })
            .clone()
    }
}
