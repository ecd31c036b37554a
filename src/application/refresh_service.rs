// Refresh service - One fetch fanned out to every screen's dashboard
use crate::application::dashboard_service::{Dashboard, RefreshOutcome, snapshot_from_payload};
use crate::application::snapshot_source::SnapshotSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub type SharedDashboard = Arc<RwLock<Dashboard>>;

#[derive(Clone)]
pub struct RefreshService {
    source: Arc<dyn SnapshotSource>,
    dashboards: Vec<SharedDashboard>,
}

impl RefreshService {
    pub fn new(source: Arc<dyn SnapshotSource>, dashboards: Vec<SharedDashboard>) -> Self {
        Self { source, dashboards }
    }

    /// Fetch once and settle every dashboard with the result.
    ///
    /// No lock is held while the fetch is outstanding, so readers keep seeing the
    /// previous snapshot until the new one is applied.
    pub async fn refresh_all(&self) -> Vec<(&'static str, RefreshOutcome)> {
        let mut tickets = Vec::with_capacity(self.dashboards.len());
        for dashboard in &self.dashboards {
            tickets.push(dashboard.write().await.begin_refresh());
        }

        let fetched = self
            .source
            .fetch_payload()
            .await
            .and_then(snapshot_from_payload)
            .map(Arc::new);

        let mut outcomes = Vec::with_capacity(self.dashboards.len());
        for (dashboard, ticket) in self.dashboards.iter().zip(tickets) {
            let mut dashboard = dashboard.write().await;
            let outcome = dashboard.complete_refresh(ticket, fetched.clone());
            outcomes.push((dashboard.name(), outcome));
        }
        outcomes
    }

    /// Poll forever. Failures are logged by the dashboards and never stop the loop.
    pub async fn run(self, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let outcomes = self.refresh_all().await;
            tracing::debug!("poll finished: {:?}", outcomes);
        }
    }
}
