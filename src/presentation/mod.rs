// Presentation layer - JSON surface for the chart, gallery and log renderers
pub mod app_state;
pub mod handlers;
pub mod view_models;
