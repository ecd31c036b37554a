use anyhow::Context;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub source: SourceSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_trailing_hours")]
    pub trailing_hours: i64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_poll_interval_seconds() -> u64 {
    60
}

fn default_trailing_hours() -> i64 {
    24
}

fn default_page_size() -> usize {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval_seconds(),
            trailing_hours: default_trailing_hours(),
            page_size: default_page_size(),
        }
    }
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl DashboardSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }

    pub fn trailing_window(&self) -> anyhow::Result<chrono::Duration> {
        if self.trailing_hours <= 0 {
            anyhow::bail!("dashboard.trailing_hours must be at least 1, got {}", self.trailing_hours);
        }
        chrono::Duration::try_hours(self.trailing_hours)
            .with_context(|| format!("dashboard.trailing_hours {} is out of range", self.trailing_hours))
    }

    pub fn page_size(&self) -> anyhow::Result<NonZeroUsize> {
        NonZeroUsize::new(self.page_size).context("dashboard.page_size must be at least 1")
    }
}

/// `config/dashboard.{toml,yaml,json}` if present, overridden by `GREENHOUSE__*` env vars.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("GREENHOUSE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    parse_app_config(settings)
}

fn parse_app_config(settings: config::Config) -> anyhow::Result<AppConfig> {
    let app_config: AppConfig = settings
        .try_deserialize()
        .context("invalid dashboard configuration")?;
    app_config.dashboard.page_size()?;
    app_config.dashboard.trailing_window()?;
    Ok(app_config)
}
