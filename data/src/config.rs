use std::path::Path;
use std::time::Duration;
use std::{fs, io};

use serde::{Deserialize, Serialize};

pub mod timezone;

use timezone::UserTimezone;

/// Horizontal distance, in pixels, under which a hovered event marker shows its tooltip.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(from = "f32")]
pub struct MarkerThreshold(f32);

impl Default for MarkerThreshold {
    fn default() -> Self {
        Self(20.0)
    }
}

impl From<f32> for MarkerThreshold {
    fn from(value: f32) -> Self {
        MarkerThreshold(value.clamp(1.0, 200.0))
    }
}

impl From<MarkerThreshold> for f32 {
    fn from(value: MarkerThreshold) -> Self {
        value.0
    }
}

/// Offsets of the plot box inside a rendered graph image, in pixels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PlotMargins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 50.0,
            top: 30.0,
            right: 10.0,
            bottom: 40.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub timezone: UserTimezone,
    pub default_from: String,
    pub default_until: String,
    pub legend_delay_ms: u64,
    pub marker_threshold: MarkerThreshold,
    pub event_tags: Vec<String>,
    pub service_url: String,
    pub margins: PlotMargins,
    pub sensitive_padding: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: UserTimezone::default(),
            default_from: "-1days".to_string(),
            default_until: String::new(),
            legend_delay_ms: 50,
            marker_threshold: MarkerThreshold::default(),
            event_tags: Vec::new(),
            service_url: "http://localhost:8080/".to_string(),
            margins: PlotMargins::default(),
            sensitive_padding: 8.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn legend_delay(&self) -> Duration {
        Duration::from_millis(self.legend_delay_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
