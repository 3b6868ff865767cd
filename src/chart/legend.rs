use std::time::Duration;

use data::YAxis;
use iced_core::Point;
use service::Point as DataPoint;

use super::abbr_large_numbers;

/// Value of `points` at `x_ms`, linearly interpolated between the bracketing
/// points. Outside the data the nearest end point is used.
pub fn value_at(points: &[DataPoint], x_ms: f64) -> Option<f64> {
    let idx = points.partition_point(|(t, _)| (*t as f64) <= x_ms);

    match (idx.checked_sub(1).map(|i| points[i]), points.get(idx).copied()) {
        (None, None) => None,
        (Some((_, v1)), None) => Some(v1),
        (None, Some((_, v2))) => Some(v2),
        (Some((t1, v1)), Some((t2, v2))) => {
            let dt = (t2 - t1) as f64;
            if dt <= 0.0 {
                return Some(v1);
            }
            Some(v1 + (v2 - v1) * (x_ms - t1 as f64) / dt)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub axis: YAxis,
    pub value: Option<f64>,
}

impl LegendEntry {
    pub fn text(&self) -> String {
        let label = match self.axis {
            YAxis::One => self.label.clone(),
            YAxis::Two => format!("{} (right)", self.label),
        };

        match self.value {
            Some(value) => format!("{label} = {}", abbr_large_numbers(value)),
            None => label,
        }
    }
}

/// Keeps at most one deferred legend update pending; later hovers only move
/// the position that update will read.
#[derive(Debug)]
pub struct HoverThrottle {
    delay: Duration,
    latest: Option<Point>,
    pending: bool,
}

impl HoverThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: None,
            pending: false,
        }
    }

    /// Records the pointer position. Returns the delay to schedule a tick
    /// with, or `None` when one is already pending.
    pub fn hover(&mut self, position: Point) -> Option<Duration> {
        self.latest = Some(position);

        if self.pending {
            None
        } else {
            self.pending = true;
            Some(self.delay)
        }
    }

    /// Consumes the pending tick, yielding the latest position if the pointer
    /// is still over the plot.
    pub fn fire(&mut self) -> Option<Point> {
        self.pending = false;
        self.latest
    }

    pub fn leave(&mut self) {
        self.latest = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
