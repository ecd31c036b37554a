// View models serialized for the chart, gallery and log renderers
use crate::application::dashboard_service::{Dashboard, FetchStatus, RefreshOutcome};
use crate::domain::chart::{ChartSeries, Metric};
use crate::domain::pagination::Page;
use crate::domain::telemetry::{ErrorEvent, ImageRecord, SensorSample};
use crate::domain::time_window::TimeWindow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LegendEntry {
    pub metric: Metric,
    pub label: &'static str,
    pub color: &'static str,
}

fn legend() -> Vec<LegendEntry> {
    Metric::ALL
        .iter()
        .map(|m| LegendEntry {
            metric: *m,
            label: m.label(),
            color: m.color(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveView {
    pub latest_sample: Option<SensorSample>,
    pub latest_image: Option<ImageRecord>,
    pub chart: ChartSeries,
    pub legend: Vec<LegendEntry>,
    pub window: TimeWindow,
    pub last_fetch: FetchStatus,
}

impl LiveView {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        Self {
            latest_sample: dashboard.latest_sample().cloned(),
            latest_image: dashboard.latest_image().cloned(),
            chart: dashboard.chart().clone(),
            legend: legend(),
            window: dashboard.window().clone(),
            last_fetch: dashboard.last_fetch().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub chart: ChartSeries,
    pub legend: Vec<LegendEntry>,
    pub gallery: Page<ImageRecord>,
    pub window: TimeWindow,
    pub last_fetch: FetchStatus,
}

impl HistoryView {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        Self {
            chart: dashboard.chart().clone(),
            legend: legend(),
            gallery: dashboard.gallery_page(),
            window: dashboard.window().clone(),
            last_fetch: dashboard.last_fetch().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogView {
    pub errors: Vec<ErrorEvent>,
    pub window: TimeWindow,
    pub last_fetch: FetchStatus,
}

impl ErrorLogView {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        Self {
            errors: dashboard.errors().to_vec(),
            window: dashboard.window().clone(),
            last_fetch: dashboard.last_fetch().clone(),
        }
    }
}

/// Date picker input. Missing, non-string or unparsable bounds leave the view unfiltered.
#[derive(Debug, Default, Deserialize)]
pub struct WindowRequest {
    #[serde(default, deserialize_with = "lenient_bound")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient_bound")]
    pub end: Option<String>,
}

fn lenient_bound<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}

impl WindowRequest {
    pub fn to_window(&self) -> TimeWindow {
        TimeWindow::explicit_from_input(self.start.as_deref(), self.end.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshReport {
    pub screen: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RefreshReport {
    pub fn new(screen: &'static str, outcome: &RefreshOutcome) -> Self {
        let (status, detail) = match outcome {
            RefreshOutcome::Applied {
                samples,
                images,
                errors,
            } => (
                "applied",
                Some(format!("{} samples, {} images, {} errors", samples, images, errors)),
            ),
            RefreshOutcome::Failed(e) => ("failed", Some(e.to_string())),
            RefreshOutcome::Stale => ("stale", None),
        };
        Self { screen, status, detail }
    }
}
