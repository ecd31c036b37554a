// Telemetry record domain models
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A source timestamp: the parsed instant, if the text was understood, plus the raw text.
///
/// An invalid instant (`instant == None`) never matches a time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timestamp {
    pub instant: Option<DateTime<Utc>>,
    pub raw: String,
}

impl Timestamp {
    pub fn parse(raw: &str) -> Self {
        Self {
            instant: parse_instant(raw),
            raw: raw.to_string(),
        }
    }

    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self::parse(s),
            Some(Value::Number(n)) => Self {
                instant: n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
                raw: n.to_string(),
            },
            _ => Self {
                instant: None,
                raw: String::new(),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }
}

/// Parse the timestamp shapes the relay and the date pickers produce.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Flask serializes SQL datetimes as HTTP dates: "Tue, 02 Jan 2024 10:00:00 GMT"
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Read a numeric field that may arrive as a JSON number or a numeric string.
pub fn tolerant_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Anything carrying a source timestamp can be time-window filtered.
pub trait Timestamped {
    fn timestamp(&self) -> &Timestamp;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSample {
    pub timestamp: Timestamp,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub light_intensity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub timestamp: Timestamp,
    #[serde(skip_serializing)]
    pub image_data: String,
    pub derived_url: String,
}

impl ImageRecord {
    pub fn new(timestamp: Timestamp, image_data: String) -> Self {
        let derived_url = format!("data:image/png;base64,{}", image_data);
        Self {
            timestamp,
            image_data,
            derived_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    pub timestamp: Timestamp,
    pub message: String,
}

impl Timestamped for SensorSample {
    fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

impl Timestamped for ImageRecord {
    fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

impl Timestamped for ErrorEvent {
    fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

/// The full normalized dataset from one successful retrieval, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub samples: Vec<SensorSample>,
    pub images: Vec<ImageRecord>,
    pub errors: Vec<ErrorEvent>,
}

impl Snapshot {
    pub fn latest_sample(&self) -> Option<&SensorSample> {
        self.samples.last()
    }

    pub fn latest_image(&self) -> Option<&ImageRecord> {
        self.images.last()
    }
}

/// Sort an error log newest first. Invalid timestamps go last; ties keep source order.
pub fn sort_errors_descending(errors: &mut [ErrorEvent]) {
    errors.sort_by(|a, b| b.timestamp.instant.cmp(&a.timestamp.instant));
}
