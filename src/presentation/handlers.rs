// HTTP request handlers
use crate::presentation::app_state::AppState;
use crate::presentation::view_models::{ErrorLogView, HistoryView, LiveView, RefreshReport, WindowRequest};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest readings plus the trailing-window chart
pub async fn live_view(State(state): State<Arc<AppState>>) -> Json<LiveView> {
    let dashboard = state.live.read().await;
    Json(LiveView::from_dashboard(&dashboard))
}

pub async fn history_view(State(state): State<Arc<AppState>>) -> Json<HistoryView> {
    let dashboard = state.history.read().await;
    Json(HistoryView::from_dashboard(&dashboard))
}

/// A body that is not a window request clears the selection.
fn window_request(payload: Result<Json<WindowRequest>, JsonRejection>) -> WindowRequest {
    match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Ignoring malformed window request: {}", rejection);
            WindowRequest::default()
        }
    }
}

pub async fn set_history_window(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WindowRequest>, JsonRejection>,
) -> Json<HistoryView> {
    let request = window_request(payload);
    let mut dashboard = state.history.write().await;
    dashboard.set_window(request.to_window());
    Json(HistoryView::from_dashboard(&dashboard))
}

pub async fn next_gallery_page(State(state): State<Arc<AppState>>) -> Json<HistoryView> {
    let mut dashboard = state.history.write().await;
    dashboard.next_page();
    Json(HistoryView::from_dashboard(&dashboard))
}

pub async fn prev_gallery_page(State(state): State<Arc<AppState>>) -> Json<HistoryView> {
    let mut dashboard = state.history.write().await;
    dashboard.prev_page();
    Json(HistoryView::from_dashboard(&dashboard))
}

pub async fn error_log(State(state): State<Arc<AppState>>) -> Json<ErrorLogView> {
    let dashboard = state.errors.read().await;
    Json(ErrorLogView::from_dashboard(&dashboard))
}

pub async fn set_error_window(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WindowRequest>, JsonRejection>,
) -> Json<ErrorLogView> {
    let request = window_request(payload);
    let mut dashboard = state.errors.write().await;
    dashboard.set_window(request.to_window());
    Json(ErrorLogView::from_dashboard(&dashboard))
}

/// Pull a fresh snapshot now instead of waiting for the next poll
pub async fn refresh_now(State(state): State<Arc<AppState>>) -> Json<Vec<RefreshReport>> {
    let outcomes = state.refresher.refresh_all().await;
    Json(
        outcomes
            .iter()
            .map(|(screen, outcome)| RefreshReport::new(*screen, outcome))
            .collect(),
    )
}
