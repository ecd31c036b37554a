// Dashboard service - Snapshot plus window/page selection for one screen
use crate::application::snapshot_source::{FetchError, SnapshotSource};
use crate::domain::chart::{ChartSeries, LabelFormat, project};
use crate::domain::normalizer::{RawPayload, normalize};
use crate::domain::pagination::{Page, PageCursor};
use crate::domain::telemetry::{
    ErrorEvent, ImageRecord, SensorSample, Snapshot, sort_errors_descending,
};
use crate::domain::time_window::{Clock, FixedClock, TimeWindow, filter};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// What a screen does with its window when a new snapshot arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowPolicy {
    /// Live view: go back to a trailing window of this length on every refresh.
    ResetTrailing(Duration),
    /// Filtering views: keep whatever the user picked (initially no filter).
    KeepSelection,
}

impl WindowPolicy {
    fn initial_window(&self) -> TimeWindow {
        match self {
            WindowPolicy::ResetTrailing(duration) => TimeWindow::Trailing { duration: *duration },
            WindowPolicy::KeepSelection => TimeWindow::unbounded(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FetchStatus {
    Never,
    Succeeded { at: DateTime<Utc> },
    Failed { at: DateTime<Utc>, reason: String },
}

/// Handed out by `begin_refresh`; completions older than the last applied snapshot are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied {
        samples: usize,
        images: usize,
        errors: usize,
    },
    Failed(FetchError),
    Stale,
}

/// Turn a raw payload into a snapshot, rejecting the relay's `{"error": ...}` body.
pub fn snapshot_from_payload(payload: RawPayload) -> Result<Snapshot, FetchError> {
    if let Some(error) = payload.error {
        return Err(FetchError::Upstream(error));
    }
    Ok(normalize(&payload))
}

pub struct Dashboard {
    name: &'static str,
    policy: WindowPolicy,
    label_format: LabelFormat,
    clock: Arc<dyn Clock>,
    snapshot: Arc<Snapshot>,
    window: TimeWindow,
    chart: ChartSeries,
    gallery: PageCursor<ImageRecord>,
    errors: Vec<ErrorEvent>,
    issued: u64,
    settled: u64,
    last_fetch: FetchStatus,
}

impl Dashboard {
    pub fn new(
        name: &'static str,
        policy: WindowPolicy,
        label_format: LabelFormat,
        page_size: NonZeroUsize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            policy,
            label_format,
            clock,
            snapshot: Arc::new(Snapshot::default()),
            window: policy.initial_window(),
            chart: ChartSeries::empty(),
            gallery: PageCursor::new(Vec::new(), page_size),
            errors: Vec::new(),
            issued: 0,
            settled: 0,
            last_fetch: FetchStatus::Never,
        }
    }

    /// At-a-glance screen: trailing window reset on every refresh, time-of-day labels.
    pub fn live(trailing: Duration, page_size: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            "live",
            WindowPolicy::ResetTrailing(trailing),
            LabelFormat::TimeOnly,
            page_size,
            clock,
        )
    }

    /// Date-range screens: no filter until the user picks dates, full date labels.
    pub fn history(name: &'static str, page_size: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            name,
            WindowPolicy::KeepSelection,
            LabelFormat::DateTime,
            page_size,
            clock,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn gallery_page(&self) -> Page<ImageRecord> {
        self.gallery.page()
    }

    /// Filtered error log, newest first.
    pub fn errors(&self) -> &[ErrorEvent] {
        &self.errors
    }

    pub fn latest_sample(&self) -> Option<&SensorSample> {
        self.snapshot.latest_sample()
    }

    pub fn latest_image(&self) -> Option<&ImageRecord> {
        self.snapshot.latest_image()
    }

    pub fn last_fetch(&self) -> &FetchStatus {
        &self.last_fetch
    }

    pub fn next_page(&mut self) -> bool {
        self.gallery.next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.gallery.prev()
    }

    /// Replace the active window and recompute projections. Does not re-fetch.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = window;
        self.recompute();
    }

    /// Re-evaluate the current window against the clock, e.g. so a trailing window slides.
    pub fn recompute(&mut self) {
        let pinned = FixedClock(self.clock.now());

        let samples = filter(&self.snapshot.samples, &self.window, &pinned);
        self.chart = project(&samples, self.label_format);

        self.gallery.replace(filter(&self.snapshot.images, &self.window, &pinned));

        let mut errors = filter(&self.snapshot.errors, &self.window, &pinned);
        sort_errors_descending(&mut errors);
        self.errors = errors;
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Settle a fetch. A failure keeps the previous snapshot and projections untouched
    /// and does not settle its ticket, so an older fetch that succeeds later still applies.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        fetched: Result<Arc<Snapshot>, FetchError>,
    ) -> RefreshOutcome {
        if ticket.0 <= self.settled {
            tracing::debug!(
                "{}: dropping refresh #{} (already settled #{})",
                self.name,
                ticket.0,
                self.settled
            );
            return RefreshOutcome::Stale;
        }

        match fetched {
            Ok(snapshot) => {
                self.settled = ticket.0;
                self.snapshot = snapshot;
                if let WindowPolicy::ResetTrailing(_) = self.policy {
                    self.window = self.policy.initial_window();
                }
                self.recompute();
                self.last_fetch = FetchStatus::Succeeded { at: self.clock.now() };

                tracing::info!(
                    "{}: applied snapshot with {} samples, {} images, {} errors",
                    self.name,
                    self.snapshot.samples.len(),
                    self.snapshot.images.len(),
                    self.snapshot.errors.len()
                );
                RefreshOutcome::Applied {
                    samples: self.snapshot.samples.len(),
                    images: self.snapshot.images.len(),
                    errors: self.snapshot.errors.len(),
                }
            }
            Err(e) => {
                tracing::warn!("{}: refresh failed, keeping previous data: {}", self.name, e);
                self.last_fetch = FetchStatus::Failed {
                    at: self.clock.now(),
                    reason: e.to_string(),
                };
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Fetch, normalize and apply in one step.
    ///
    /// Holds `&mut self` across the fetch. For dashboards shared behind a lock use
    /// `RefreshService::refresh_all`, which fetches without holding it.
    pub async fn refresh(&mut self, source: &dyn SnapshotSource) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let fetched = source
            .fetch_payload()
            .await
            .and_then(snapshot_from_payload)
            .map(Arc::new);
        self.complete_refresh(ticket, fetched)
    }
}
