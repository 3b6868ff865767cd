pub mod dual_plot;
pub mod geometry;
pub mod legend;
pub mod marker;
pub mod range;
pub mod selection;

pub use dual_plot::{DualPlotController, PlotInput, PlotSeries};
pub use geometry::GraphGeometry;
pub use range::TimeScale;

/// Which of the two coupled plots an event or draw call concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotTarget {
    /// The zoomable chart with a legend.
    Detail,
    /// The always-unzoomed strip under it.
    Overview,
}

pub fn abbr_large_numbers(value: f64) -> String {
    let abs = value.abs();

    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else {
        (value, "")
    };

    if suffix.is_empty() && abs > 0.0 && abs < 1.0 {
        format!("{scaled:.4}")
    } else {
        format!("{scaled:.2}{suffix}")
    }
}
