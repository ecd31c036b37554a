// Application layer - Use cases over the telemetry pipeline
pub mod dashboard_service;
pub mod refresh_service;
pub mod snapshot_source;
