//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::warn;

use crate::domain::StopCode;
use crate::refresh::RefreshController;

use super::dto::{ErrorResponse, StopBoardResponse, VisibilityRequest};
use super::state::AppState;
use super::templates::BoardTemplate;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(home_board))
        .route("/health", get(health))
        .route("/stop/:code", get(stop_board))
        .route("/api/stop/:code", get(stop_json))
        .route("/api/stop/:code/refresh", post(refresh_stop))
        .route("/api/visibility", post(set_visibility))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Board page for the configured home stop.
async fn home_board(State(state): State<AppState>) -> Result<Response, AppError> {
    let stop = state.home_stop.clone();
    render_board(&state, stop).await
}

/// Board page for an arbitrary stop code.
async fn stop_board(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let stop = parse_stop(&code)?;
    render_board(&state, stop).await
}

/// JSON snapshot of a stop's board without forcing a fetch.
async fn stop_json(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StopBoardResponse>, AppError> {
    let stop = parse_stop(&code)?;
    let controller = state.controller_for(&stop).await;
    Ok(Json(board_response(&state, &controller).await))
}

/// Manual refresh through the controller.
///
/// The controller decides whether a fetch actually happens (gap, single
/// flight); either way the current board state comes back. Transport
/// failures surface in the payload's `error` field, not as an HTTP error,
/// so the board can keep showing the retained snapshot.
async fn refresh_stop(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StopBoardResponse>, AppError> {
    let stop = parse_stop(&code)?;
    let controller = state.controller_for(&stop).await;
    controller.request_refresh().await;
    Ok(Json(board_response(&state, &controller).await))
}

/// Record a browser visibility change.
async fn set_visibility(
    State(state): State<AppState>,
    Json(req): Json<VisibilityRequest>,
) -> StatusCode {
    state.visibility.set_visible(req.visible);
    StatusCode::NO_CONTENT
}

/// Render the board page for a stop, triggering a refresh first so a fresh
/// page load shows current data (the controller drops the request when
/// inside the gap).
async fn render_board(state: &AppState, stop: StopCode) -> Result<Response, AppError> {
    let controller = state.controller_for(&stop).await;
    controller.request_refresh().await;

    let snapshot = controller.latest().await;
    let template = BoardTemplate::build(
        stop.as_str(),
        snapshot.as_deref(),
        controller.last_error().await,
        controller.cooldown_seconds_remaining().await,
        state.auto_interval_secs(),
        &state.colors,
    );

    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(Html(html).into_response())
}

/// Assemble the JSON board payload from controller state.
async fn board_response(state: &AppState, controller: &RefreshController) -> StopBoardResponse {
    let snapshot = controller.latest().await;
    StopBoardResponse::build(
        controller.stop().as_str(),
        snapshot.as_deref(),
        controller.last_error().await,
        controller.cooldown_seconds_remaining().await,
        controller.is_refreshing().await,
        &state.colors,
    )
}

fn parse_stop(code: &str) -> Result<StopCode, AppError> {
    StopCode::parse(code).map_err(|_| AppError::BadRequest {
        message: format!("Invalid stop code: {}", code),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
