// Source trait for raw dashboard payloads
use crate::domain::normalizer::RawPayload;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("source responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode payload: {0}")]
    Decode(String),

    #[error("source reported an error: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Pull the full raw payload (sensor rows, images, error log)
    async fn fetch_payload(&self) -> Result<RawPayload, FetchError>;
}
