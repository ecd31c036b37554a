// Series projector - column-oriented chart data from sensor samples
use super::telemetry::{SensorSample, Timestamp};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Temperature,
    Humidity,
    SoilMoisture,
    LightIntensity,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::SoilMoisture,
        Metric::LightIntensity,
    ];

    pub fn value(&self, sample: &SensorSample) -> Option<f64> {
        match self {
            Metric::Temperature => sample.temperature,
            Metric::Humidity => sample.humidity,
            Metric::SoilMoisture => sample.soil_moisture,
            Metric::LightIntensity => sample.light_intensity,
        }
    }

    /// Legend text
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::SoilMoisture => "Soil Moisture (%)",
            Metric::LightIntensity => "Light Intensity",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Metric::Temperature => "red",
            Metric::Humidity => "blue",
            Metric::SoilMoisture => "green",
            Metric::LightIntensity => "orange",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    TimeOnly,
    DateTime,
}

impl LabelFormat {
    pub fn render(&self, timestamp: &Timestamp) -> String {
        let pattern = match self {
            LabelFormat::TimeOnly => "%H:%M:%S",
            LabelFormat::DateTime => "%Y-%m-%d %H:%M:%S",
        };
        match timestamp.instant {
            Some(instant) => instant.format(pattern).to_string(),
            None => timestamp.raw.clone(),
        }
    }
}

/// One shared label axis and one value column per metric, all index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: BTreeMap<Metric, Vec<Option<f64>>>,
}

impl ChartSeries {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            series: Metric::ALL.iter().map(|m| (*m, Vec::new())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn values(&self, metric: Metric) -> &[Option<f64>] {
        self.series.get(&metric).map(Vec::as_slice).unwrap_or_default()
    }
}

/// One chart point per sample; no aggregation or resampling.
pub fn project(samples: &[SensorSample], format: LabelFormat) -> ChartSeries {
    let mut chart = ChartSeries::empty();
    chart.labels = samples.iter().map(|s| format.render(&s.timestamp)).collect();
    for (metric, column) in chart.series.iter_mut() {
        *column = samples.iter().map(|s| metric.value(s)).collect();
    }
    chart
}
