//! Per-metric series state.
//!
//! Each metric row remembers the generation of the last fetch issued for it.
//! A response is applied only when its ticket still matches that generation and
//! the window it was requested for; anything else is stale and dropped.

use std::fmt;

use enum_map::Enum;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use service::Series;

use crate::window::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    #[default]
    One,
    Two,
}

impl YAxis {
    pub fn toggled(self) -> Self {
        match self {
            YAxis::One => YAxis::Two,
            YAxis::Two => YAxis::One,
        }
    }
}

impl fmt::Display for YAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YAxis::One => write!(f, "one"),
            YAxis::Two => write!(f, "two"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct MetricRow {
    pub name: String,
    pub axis: YAxis,
    /// One entry per expanded target; empty until the first successful fetch.
    pub series: Vec<Series>,
    pub status: RowStatus,
    generation: u64,
}

/// Issued with every fetch and handed back with its response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub metric: String,
    pub window: TimeWindow,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Failed,
    Stale,
}

#[derive(Debug, Default)]
pub struct MetricSeriesStore {
    rows: FxHashMap<String, MetricRow>,
    order: Vec<String>,
    next_generation: u64,
}

impl MetricSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `name` on axis one and returns the ticket for its first fetch.
    /// Returns `None` when the metric is already present.
    pub fn add_metric(&mut self, name: &str, window: TimeWindow) -> Option<FetchTicket> {
        let name = name.trim();
        if name.is_empty() || self.rows.contains_key(name) {
            return None;
        }

        self.rows.insert(
            name.to_string(),
            MetricRow {
                name: name.to_string(),
                axis: YAxis::default(),
                series: Vec::new(),
                status: RowStatus::Loading,
                generation: 0,
            },
        );
        self.order.push(name.to_string());

        self.refresh(name, window)
    }

    /// Drops the row. An in-flight fetch is left alone; its response will be stale.
    pub fn remove_metric(&mut self, name: &str) -> bool {
        let name = name.trim();
        self.order.retain(|n| n != name);
        self.rows.remove(name).is_some()
    }

    pub fn set_axis(&mut self, name: &str, axis: YAxis) -> bool {
        match self.rows.get_mut(name.trim()) {
            Some(row) => {
                row.axis = axis;
                true
            }
            None => false,
        }
    }

    pub fn toggle_axis(&mut self, name: &str) -> Option<YAxis> {
        let row = self.rows.get_mut(name.trim())?;
        row.axis = row.axis.toggled();
        Some(row.axis)
    }

    /// Starts a new fetch generation for `name`. Previously loaded series stay
    /// visible until the response arrives.
    pub fn refresh(&mut self, name: &str, window: TimeWindow) -> Option<FetchTicket> {
        let row = self.rows.get_mut(name.trim())?;

        self.next_generation += 1;
        row.generation = self.next_generation;
        row.status = RowStatus::Loading;

        Some(FetchTicket {
            metric: row.name.clone(),
            window,
            generation: row.generation,
        })
    }

    pub fn refresh_all(&mut self, window: TimeWindow) -> Vec<FetchTicket> {
        let names = self.order.clone();

        names
            .iter()
            .filter_map(|name| self.refresh(name, window))
            .collect()
    }

    /// Applies a fetch outcome if `ticket` is still current for `window`.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        window: TimeWindow,
        result: Result<Vec<Series>, String>,
    ) -> Applied {
        let Some(row) = self.rows.get_mut(&ticket.metric) else {
            log::debug!("dropping response for removed metric {}", ticket.metric);
            return Applied::Stale;
        };

        if ticket.window != window || ticket.generation != row.generation {
            log::debug!(
                "dropping superseded response for {} (generation {}, current {})",
                ticket.metric,
                ticket.generation,
                row.generation
            );
            return Applied::Stale;
        }

        match result {
            Ok(series) => {
                row.series = series;
                row.status = RowStatus::Ready;
                Applied::Updated
            }
            Err(reason) => {
                log::warn!("fetch for {} failed: {}", ticket.metric, reason);
                row.status = RowStatus::Failed(reason);
                Applied::Failed
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MetricRow> {
        self.rows.get(name.trim())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rows.contains_key(name.trim())
    }

    /// Rows in the order they were added.
    pub fn rows(&self) -> impl Iterator<Item = &MetricRow> {
        self.order.iter().filter_map(|name| self.rows.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
