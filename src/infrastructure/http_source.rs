// HTTP snapshot source backed by the relay's /alldata endpoint
use crate::application::snapshot_source::{FetchError, SnapshotSource};
use crate::domain::normalizer::RawPayload;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;

const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_payload(&self) -> Result<RawPayload, FetchError> {
        tracing::debug!("Fetching dashboard payload from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_payload(status, &body)
    }
}

fn decode_payload(status: u16, body: &str) -> Result<RawPayload, FetchError> {
    if !(200..300).contains(&status) {
        let mut body = body.to_string();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
            body.truncate(cut);
        }
        return Err(FetchError::Status { status, body });
    }

    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payload() {
        let payload = decode_payload(
            200,
            r#"{"sensorData": [{"date_time": "Mon, 01 Jan 2024 10:00:00 GMT", "temp_air": "21.40"}]}"#,
        )
        .unwrap();

        assert_eq!(payload.sensor_data.map(|rows| rows.len()), Some(1));
        assert!(payload.images.is_none());
        assert!(payload.error.is_none());
    }

    #[test]
    fn test_decode_non_success_status() {
        let err = decode_payload(500, "Internal Server Error").unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 500,
                body: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn test_decode_truncates_long_error_body() {
        let long = "x".repeat(4096);
        match decode_payload(502, &long) {
            Err(FetchError::Status { body, .. }) => assert_eq!(body.len(), MAX_ERROR_BODY),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(matches!(decode_payload(200, "<html>"), Err(FetchError::Decode(_))));
        assert!(matches!(decode_payload(200, "[1, 2, 3]"), Err(FetchError::Decode(_))));
    }
}
