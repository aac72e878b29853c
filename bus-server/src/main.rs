use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bus_server::domain::{RouteColors, StopCode};
use bus_server::refresh::{RefreshConfig, RefreshOutcome, VisibilitySignal};
use bus_server::upstream::{BusTimeClient, BusTimeConfig};
use bus_server::web::{AppState, create_router};

/// Stop shown on the index page when BUS_HOME_STOP is not set.
const DEFAULT_HOME_STOP: &str = "308209";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bus_server=info")),
        )
        .init();

    // Home stop from environment, falling back to the built-in default
    let home_stop = match std::env::var("BUS_HOME_STOP") {
        Ok(code) => StopCode::parse(&code).expect("BUS_HOME_STOP is not a valid stop code"),
        Err(_) => StopCode::parse(DEFAULT_HOME_STOP).expect("default stop code is valid"),
    };

    // Create the tracker client
    let mut tracker_config = BusTimeConfig::new();
    if let Ok(url) = std::env::var("BUS_TRACKER_URL") {
        tracker_config = tracker_config.with_base_url(url);
    }
    let client = BusTimeClient::new(tracker_config).expect("Failed to create tracker client");

    let visibility = VisibilitySignal::new();
    let state = AppState::new(
        home_stop.clone(),
        Arc::new(client),
        RefreshConfig::default(),
        RouteColors::default(),
        visibility.clone(),
    );

    // Prime the home stop so the first page load has data, then keep it
    // fresh while the board reports itself visible.
    let home_controller = state.controller_for(&home_stop).await;
    match home_controller.request_refresh().await {
        RefreshOutcome::Refreshed(snapshot) => {
            info!(stop = %home_stop, routes = snapshot.routes.len(), "initial refresh done");
        }
        RefreshOutcome::Cooling { .. } => {}
        RefreshOutcome::Failed(e) => {
            warn!(stop = %home_stop, error = %e, "initial refresh failed; will retry on schedule");
        }
    }
    home_controller.spawn_auto_refresh(visibility);

    let static_dir = std::env::var("BUS_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let app = create_router(state, &static_dir);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("bus arrival board listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
