// Domain layer - Telemetry pipeline with no I/O
pub mod chart;
pub mod normalizer;
pub mod pagination;
pub mod telemetry;
pub mod time_window;
