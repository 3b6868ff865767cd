use data::PlotMargins;
use iced_core::{Point, Rectangle};

/// Pixel layout of one graph, in page coordinates.
///
/// `sensitive` is where a press may start a selection; it extends a little past
/// `plot` (the chart area proper) and never beyond `image`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphGeometry {
    pub image: Rectangle,
    pub plot: Rectangle,
    pub sensitive: Rectangle,
}

impl GraphGeometry {
    /// Derives the plot box and sensitive zone of a rendered graph image.
    /// Returns `None` when the margins leave no plot area.
    pub fn from_image(image: Rectangle, margins: PlotMargins, padding: f32) -> Option<Self> {
        let plot = Rectangle {
            x: image.x + margins.left,
            y: image.y + margins.top,
            width: image.width - margins.left - margins.right,
            height: image.height - margins.top - margins.bottom,
        };

        if plot.width <= 0.0 || plot.height <= 0.0 {
            return None;
        }

        Some(Self {
            image,
            plot,
            sensitive: clip(expand(plot, padding), image),
        })
    }

    /// Geometry of a plot-library canvas, where the host reports the plot box directly.
    pub fn from_plot(plot: Rectangle, padding: f32) -> Self {
        let sensitive = expand(plot, padding);

        Self {
            image: sensitive,
            plot,
            sensitive,
        }
    }

    pub fn in_sensitive_zone(&self, point: Point) -> bool {
        self.sensitive.contains(point)
    }

    pub fn in_plot(&self, point: Point) -> bool {
        self.plot.contains(point)
    }
}

fn expand(rect: Rectangle, padding: f32) -> Rectangle {
    let padding = padding.max(0.0);

    Rectangle {
        x: rect.x - padding,
        y: rect.y - padding,
        width: rect.width + 2.0 * padding,
        height: rect.height + 2.0 * padding,
    }
}

fn clip(rect: Rectangle, bounds: Rectangle) -> Rectangle {
    let left = rect.x.max(bounds.x);
    let top = rect.y.max(bounds.y);
    let right = (rect.x + rect.width).min(bounds.x + bounds.width);
    let bottom = (rect.y + rect.height).min(bounds.y + bounds.height);

    Rectangle {
        x: left,
        y: top,
        width: (right - left).max(0.0),
        height: (bottom - top).max(0.0),
    }
}
