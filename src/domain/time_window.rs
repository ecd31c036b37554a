// Time window filter and the clock it is evaluated against
use super::telemetry::{Timestamped, parse_instant};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Source of "now". Injected so a filter pass can be evaluated against a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimeWindow {
    /// Everything at or after `now - duration`.
    Trailing {
        #[serde(rename = "seconds", serialize_with = "serialize_seconds")]
        duration: Duration,
    },
    /// Inclusive calendar range. `end` is the last millisecond of the picked day.
    /// If either bound is missing the window does not filter.
    Explicit {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

fn serialize_seconds<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

impl TimeWindow {
    pub fn trailing_hours(hours: i64) -> Self {
        TimeWindow::Trailing {
            duration: Duration::try_hours(hours).unwrap_or(Duration::MAX),
        }
    }

    pub fn unbounded() -> Self {
        TimeWindow::Explicit { start: None, end: None }
    }

    /// Build an explicit window from user input. Unparsable bounds are treated as unset.
    pub fn explicit_from_input(start: Option<&str>, end: Option<&str>) -> Self {
        TimeWindow::Explicit {
            start: start.and_then(parse_instant),
            end: end.and_then(parse_end_bound),
        }
    }

    /// The resolved `[from, to]` bounds, or `None` when the window does not filter.
    fn bounds(&self, clock: &dyn Clock) -> Option<(DateTime<Utc>, Option<DateTime<Utc>>)> {
        match self {
            TimeWindow::Trailing { duration } => {
                let from = clock
                    .now()
                    .checked_sub_signed(*duration)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                Some((from, None))
            }
            TimeWindow::Explicit {
                start: Some(start),
                end: Some(end),
            } => Some((*start, Some(*end))),
            TimeWindow::Explicit { .. } => None,
        }
    }
}

/// 23:59:59.999 on the calendar day of `instant`, in the instant's own offset.
pub fn end_of_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Utc> {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
    instant
        .date_naive()
        .and_time(last_ms)
        .and_local_timezone(instant.timezone())
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| instant.with_timezone(&Utc))
}

/// The picked day is the wall-clock date as written, so an offset-bearing
/// bound is closed in its own offset before converting to UTC.
fn parse_end_bound(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw).or_else(|_| DateTime::parse_from_rfc2822(raw)) {
        return Some(end_of_day(&dt));
    }
    parse_instant(raw).map(|dt| end_of_day(&dt))
}

/// Keep the entries that fall inside `window`, preserving input order.
///
/// "Now" is read once per call. Entries with an invalid timestamp never match
/// a filtering window.
pub fn filter<T: Timestamped + Clone>(items: &[T], window: &TimeWindow, clock: &dyn Clock) -> Vec<T> {
    let Some((from, to)) = window.bounds(clock) else {
        return items.to_vec();
    };

    items
        .iter()
        .filter(|item| match item.timestamp().instant {
            Some(ts) => ts >= from && to.is_none_or(|to| ts <= to),
            None => false,
        })
        .cloned()
        .collect()
}
