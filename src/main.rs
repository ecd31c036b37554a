// Main entry point - Dependency injection, polling and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::Dashboard;
use crate::application::refresh_service::RefreshService;
use crate::domain::time_window::{Clock, SystemClock};
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_source::HttpSnapshotSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    error_log, health_check, history_view, live_view, next_gallery_page, prev_gallery_page,
    refresh_now, set_error_window, set_history_window,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;
    let page_size = config.dashboard.page_size()?;
    let trailing_window = config.dashboard.trailing_window()?;

    // Create data source (infrastructure layer)
    let source = Arc::new(HttpSnapshotSource::new(
        config.source.url.clone(),
        config.source.timeout(),
    )?);

    // One dashboard per screen (application layer)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let live = Arc::new(RwLock::new(Dashboard::live(
        trailing_window,
        page_size,
        clock.clone(),
    )));
    let history = Arc::new(RwLock::new(Dashboard::history("history", page_size, clock.clone())));
    let errors = Arc::new(RwLock::new(Dashboard::history("errors", page_size, clock)));

    let refresher = RefreshService::new(source, vec![live.clone(), history.clone(), errors.clone()]);
    tokio::spawn(refresher.clone().run(config.dashboard.poll_interval()));

    let state = Arc::new(AppState {
        live,
        history,
        errors,
        refresher,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/live", get(live_view))
        .route("/history", get(history_view))
        .route("/history/window", put(set_history_window))
        .route("/history/gallery/next", post(next_gallery_page))
        .route("/history/gallery/prev", post(prev_gallery_page))
        .route("/errors", get(error_log))
        .route("/errors/window", put(set_error_window))
        .route("/refresh", post(refresh_now))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting greenhouse-dashboard on {} (source {})",
        addr,
        config.source.url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
