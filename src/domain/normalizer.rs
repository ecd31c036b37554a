// Record normalizer - raw relay rows into typed, source-ordered collections
use super::telemetry::{ErrorEvent, ImageRecord, SensorSample, Snapshot, Timestamp, tolerant_f64};
use serde::Deserialize;
use serde_json::Value;

/// The `/alldata` body. Every section is optional; `error` is set when the relay's query failed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPayload {
    #[serde(default, rename = "sensorData")]
    pub sensor_data: Option<Vec<Value>>,
    #[serde(default)]
    pub images: Option<Vec<Value>>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

pub fn normalize(raw: &RawPayload) -> Snapshot {
    let samples: Vec<SensorSample> = rows(&raw.sensor_data).iter().map(sample_from_row).collect();
    let images: Vec<ImageRecord> = rows(&raw.images).iter().map(image_from_row).collect();
    let errors: Vec<ErrorEvent> = rows(&raw.errors).iter().map(error_from_row).collect();

    let invalid = samples.iter().filter(|s| !s.timestamp.is_valid()).count()
        + images.iter().filter(|i| !i.timestamp.is_valid()).count()
        + errors.iter().filter(|e| !e.timestamp.is_valid()).count();
    if invalid > 0 {
        tracing::debug!("{} rows carry an unparsable date_time and will not match any window", invalid);
    }

    Snapshot {
        samples,
        images,
        errors,
    }
}

fn rows(section: &Option<Vec<Value>>) -> &[Value] {
    section.as_deref().unwrap_or_default()
}

fn sample_from_row(row: &Value) -> SensorSample {
    SensorSample {
        timestamp: Timestamp::from_value(row.get("date_time")),
        temperature: tolerant_f64(row.get("temp_air")),
        humidity: tolerant_f64(row.get("hum_air")),
        soil_moisture: tolerant_f64(row.get("hum_soil")),
        light_intensity: tolerant_f64(row.get("light")),
    }
}

fn image_from_row(row: &Value) -> ImageRecord {
    let payload = row
        .get("image_base64")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    ImageRecord::new(Timestamp::from_value(row.get("date_time")), payload)
}

fn error_from_row(row: &Value) -> ErrorEvent {
    let message = match row.get("error") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    ErrorEvent {
        timestamp: Timestamp::from_value(row.get("date_time")),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RawPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_empty_payload() {
        let snapshot = normalize(&payload(json!({})));
        assert!(snapshot.samples.is_empty());
        assert!(snapshot.images.is_empty());
        assert!(snapshot.errors.is_empty());
    }

    #[test]
    fn test_normalize_null_and_partial_sections() {
        let snapshot = normalize(&payload(json!({
            "sensorData": null,
            "errors": [{"date_time": "2024-01-01 10:00:00", "error": "camera timeout"}]
        })));
        assert!(snapshot.samples.is_empty());
        assert!(snapshot.images.is_empty());
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(snapshot.errors[0].message, "camera timeout");
    }

    #[test]
    fn test_normalize_sensor_rows() {
        let snapshot = normalize(&payload(json!({
            "sensorData": [
                {"date_time": "2024-01-01 10:00:00", "temp_air": 21.5, "hum_air": 60, "hum_soil": "41.0", "light": 800},
                {"date_time": "2024-01-01 11:00:00", "temp_air": 22.0}
            ]
        })));

        assert_eq!(snapshot.samples.len(), 2);
        let first = &snapshot.samples[0];
        assert_eq!(first.temperature, Some(21.5));
        assert_eq!(first.humidity, Some(60.0));
        assert_eq!(first.soil_moisture, Some(41.0));
        assert_eq!(first.light_intensity, Some(800.0));

        let partial = &snapshot.samples[1];
        assert_eq!(partial.temperature, Some(22.0));
        assert_eq!(partial.humidity, None);
        assert_eq!(partial.light_intensity, None);
    }

    #[test]
    fn test_normalize_keeps_source_order_and_bad_rows() {
        let snapshot = normalize(&payload(json!({
            "sensorData": [
                {"date_time": "2024-01-02 10:00:00", "temp_air": 1},
                {"date_time": "not a date", "temp_air": 2},
                "not even an object",
                {"date_time": "2024-01-01 10:00:00", "temp_air": 3}
            ]
        })));

        let temps: Vec<Option<f64>> = snapshot.samples.iter().map(|s| s.temperature).collect();
        assert_eq!(temps, vec![Some(1.0), Some(2.0), None, Some(3.0)]);
        assert!(!snapshot.samples[1].timestamp.is_valid());
        assert_eq!(snapshot.samples[1].timestamp.raw, "not a date");
    }

    #[test]
    fn test_normalize_images() {
        let snapshot = normalize(&payload(json!({
            "images": [
                {"date_time": "2024-01-01 10:00:00", "image_base64": "AAAA"},
                {"date_time": "2024-01-01 11:00:00"}
            ]
        })));

        assert_eq!(snapshot.images[0].derived_url, "data:image/png;base64,AAAA");
        assert_eq!(snapshot.images[0].image_data, "AAAA");
        assert_eq!(snapshot.images[1].derived_url, "data:image/png;base64,");
    }

    #[test]
    fn test_upstream_error_body_deserializes() {
        let raw = payload(json!({"error": "Can't connect to MySQL server"}));
        assert_eq!(raw.error.as_deref(), Some("Can't connect to MySQL server"));
        assert!(normalize(&raw).samples.is_empty());
    }
}
