pub mod client;
pub mod graph_url;

pub use client::GraphClient;

use serde::{Deserialize, Serialize};

use std::future::Future;

/// One datapoint: (timestamp in milliseconds, value).
pub type Point = (i64, f64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// First and last timestamp, in milliseconds.
    pub fn extent(&self) -> Option<(i64, i64)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }
}

/// Vertical annotation drawn at `timestamp_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub timestamp_ms: i64,
    pub label: String,
    pub id: u64,
}

/// Raw-data record as returned by the render endpoint, one per expanded target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderRecord {
    #[serde(alias = "target")]
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub step: i64,
    pub data: Vec<Option<f64>>,
}

impl RenderRecord {
    /// Rebuilds timestamps as `start + step * i`; null datapoints are dropped.
    pub fn into_series(self) -> Series {
        let points = self
            .data
            .iter()
            .enumerate()
            .filter_map(|(i, value)| {
                let ts = self.start + self.step * i as i64;
                value.map(|v| (ts * 1000, v))
            })
            .collect();

        Series {
            name: self.name,
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventRecord {
    /// Epoch seconds, possibly fractional.
    pub when: f64,
    pub what: String,
    pub id: u64,
}

impl From<EventRecord> for EventMarker {
    fn from(record: EventRecord) -> Self {
        EventMarker {
            timestamp_ms: (record.when * 1000.0).round() as i64,
            label: record.what,
            id: record.id,
        }
    }
}

/// Query for one metric target. Time tokens are already encoded for a query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricQuery {
    pub target: String,
    pub from: String,
    pub until: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventQuery {
    pub from: String,
    pub until: String,
    pub tags: Vec<String>,
}

/// Anything that can answer metric and event queries for a time window.
pub trait DataSource {
    fn fetch_metric(&self, query: &MetricQuery)
    -> impl Future<Output = Result<Vec<Series>, Error>>;

    fn fetch_events(
        &self,
        query: &EventQuery,
    ) -> impl Future<Output = Result<Vec<EventMarker>, Error>>;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Graph service responded with status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid service URL: {0}")]
    Url(#[from] url::ParseError),
}
