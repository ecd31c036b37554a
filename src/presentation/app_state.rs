// Application state for HTTP handlers
use crate::application::refresh_service::{RefreshService, SharedDashboard};

#[derive(Clone)]
pub struct AppState {
    pub live: SharedDashboard,
    pub history: SharedDashboard,
    pub errors: SharedDashboard,
    pub refresher: RefreshService,
}
