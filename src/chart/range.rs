//! Mapping between pixel extents and time ranges.

use data::TimeWindow;
use iced_core::{Point, Rectangle};

/// Rectangle spanning `a` and `b`, whatever the drag direction.
pub fn normalize(a: Point, b: Point) -> Rectangle {
    Rectangle {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (a.x - b.x).abs(),
        height: (a.y - b.y).abs(),
    }
}

/// Translates a selection rectangle over `plot` into a sub-range of `current`.
///
/// The rectangle is clamped into the plot box first. Returns `None` when
/// nothing of it is left on either axis, or when the result would be empty.
pub fn rect_to_time_range(
    rect: Rectangle,
    plot: Rectangle,
    current: TimeWindow,
) -> Option<TimeWindow> {
    let plot_width = f64::from(plot.width);
    if plot_width <= 0.0 {
        return None;
    }

    let clamp_x = |x: f32| f64::from(x - plot.x).clamp(0.0, plot_width);
    let clamp_y = |y: f32| f64::from(y - plot.y).clamp(0.0, f64::from(plot.height));

    let left = clamp_x(rect.x);
    let right = clamp_x(rect.x + rect.width);
    let top = clamp_y(rect.y);
    let bottom = clamp_y(rect.y + rect.height);

    if right <= left || bottom <= top {
        return None;
    }

    let seconds_per_pixel = current.span() as f64 / plot_width;

    let from = (current.from as f64 + left * seconds_per_pixel).round() as i64;
    let until = (current.until as f64 - (plot_width - right) * seconds_per_pixel).round() as i64;

    TimeWindow::new(from, until).ok()
}

/// Widens `current` by twice its span on each side. `None` when the result
/// does not fit in epoch seconds.
pub fn zoom_out(current: TimeWindow) -> Option<TimeWindow> {
    let margin = current
        .until
        .checked_sub(current.from)?
        .checked_mul(2)?;

    TimeWindow::new(
        current.from.checked_sub(margin)?,
        current.until.checked_add(margin)?,
    )
    .ok()
}

/// Linear map from a time range (milliseconds) onto a plot box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    plot: Rectangle,
    from_ms: f64,
    span_ms: f64,
}

impl TimeScale {
    pub fn new(plot: Rectangle, window: TimeWindow) -> Self {
        Self {
            plot,
            from_ms: window.from_ms() as f64,
            span_ms: (window.span() * 1000).max(1) as f64,
        }
    }

    pub fn plot(&self) -> Rectangle {
        self.plot
    }

    pub fn x_of(&self, timestamp_ms: i64) -> f32 {
        let t = (timestamp_ms as f64 - self.from_ms) / self.span_ms;
        self.plot.x + (t * f64::from(self.plot.width)) as f32
    }

    pub fn time_at(&self, x: f32) -> f64 {
        let width = f64::from(self.plot.width.max(1.0));
        self.from_ms + f64::from(x - self.plot.x) / width * self.span_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plot() -> Rectangle {
        Rectangle {
            x: 40.0,
            y: 10.0,
            width: 500.0,
            height: 200.0,
        }
    }

    fn window(from: i64, until: i64) -> TimeWindow {
        TimeWindow::new(from, until).unwrap()
    }

    #[test]
    fn drag_maps_to_sub_range() {
        let rect = normalize(Point::new(40.0 + 250.0, 20.0), Point::new(40.0 + 125.0, 90.0));
        assert_eq!(
            rect_to_time_range(rect, plot(), window(1000, 2000)),
            Some(window(1250, 1500))
        );
    }

    #[test]
    fn full_plot_is_identity() {
        assert_eq!(
            rect_to_time_range(plot(), plot(), window(1000, 2000)),
            Some(window(1000, 2000))
        );
    }

    #[test]
    fn overhanging_rect_is_clamped() {
        let rect = Rectangle {
            x: 0.0,
            y: 0.0,
            width: 140.0,
            height: 400.0,
        };
        assert_eq!(
            rect_to_time_range(rect, plot(), window(1000, 2000)),
            Some(window(1000, 1200))
        );
    }

    #[test]
    fn degenerate_rects_do_not_zoom() {
        let zero_width = Rectangle {
            x: 100.0,
            y: 20.0,
            width: 0.0,
            height: 50.0,
        };
        let zero_height = Rectangle {
            height: 0.0,
            width: 50.0,
            ..zero_width
        };
        let left_of_plot = Rectangle {
            x: 0.0,
            y: 20.0,
            width: 30.0,
            height: 50.0,
        };
        let below_plot = Rectangle {
            x: 100.0,
            y: 300.0,
            width: 30.0,
            height: 50.0,
        };

        for rect in [zero_width, zero_height, left_of_plot, below_plot] {
            assert_eq!(rect_to_time_range(rect, plot(), window(1000, 2000)), None);
        }
    }

    #[test]
    fn sub_second_selection_collapses_to_none() {
        let rect = Rectangle {
            x: 100.0,
            y: 20.0,
            width: 0.2,
            height: 50.0,
        };
        assert_eq!(rect_to_time_range(rect, plot(), window(0, 10)), None);
    }

    #[test]
    fn zoom_out_composes_from_current_span() {
        let once = zoom_out(window(1000, 2000));
        assert_eq!(once, Some(window(-1000, 4000)));

        let twice = once.and_then(zoom_out);
        assert_eq!(twice, Some(window(1000 - 12 * 1000, 2000 + 12 * 1000)));
    }

    #[test]
    fn zoom_out_stops_at_i64_limits() {
        assert_eq!(zoom_out(window(i64::MIN / 2, i64::MAX / 2)), None);
        assert_eq!(zoom_out(window(i64::MAX - 10, i64::MAX)), None);
    }

    #[test]
    fn scale_maps_both_ways() {
        let scale = TimeScale::new(plot(), window(1000, 2000));

        assert_eq!(scale.x_of(1_000_000), 40.0);
        assert_eq!(scale.x_of(1_500_000), 290.0);
        assert_eq!(scale.time_at(540.0), 2_000_000.0);
    }

    proptest! {
        #[test]
        fn selection_stays_within_current(
            from in -1_000_000i64..1_000_000,
            span in 1i64..1_000_000,
            a in -100.0f32..700.0,
            b in -100.0f32..700.0,
        ) {
            let current = window(from, from + span);
            let rect = normalize(Point::new(a, 20.0), Point::new(b, 60.0));

            if let Some(zoomed) = rect_to_time_range(rect, plot(), current) {
                prop_assert!(current.covers(&zoomed));
                prop_assert!(zoomed.from < zoomed.until);
            }
        }
    }
}
