//! The detail plot and the overview strip, kept in step.
//!
//! Both are rebuilt from the series store on every render, which makes
//! rendering safe to repeat as each fetch completes. A selection on the
//! overview sets the zoom range outright; a selection on the detail plot is
//! read against the range it currently shows, so repeated drags keep narrowing.

use data::{MetricSeriesStore, TimeWindow, YAxis};
use enum_map::EnumMap;
use iced_core::{Point, Rectangle};
use palette::{FromColor, Hsl, Srgb};
use service::{EventMarker, Point as DataPoint};

use super::PlotTarget;
use super::geometry::GraphGeometry;
use super::legend::{LegendEntry, value_at};
use super::range::{TimeScale, rect_to_time_range, zoom_out};
use super::selection::{self, SelectionDragController};
use crate::widget::pointer::PointerEvent;

const GOLDEN_ANGLE: f32 = 137.508;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub axis: YAxis,
    pub color: Srgb<u8>,
    pub points: Vec<DataPoint>,
}

/// Everything the plotting library needs to draw one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotInput {
    pub series: Vec<PlotSeries>,
    /// Visible x range, in milliseconds.
    pub x_range: (i64, i64),
    /// Value range of the visible points on each axis.
    pub y_extents: EnumMap<YAxis, Option<(f64, f64)>>,
    /// Timestamps (ms) of the vertical event lines inside `x_range`.
    pub markers: Vec<i64>,
    pub legend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Draw(PlotTarget, Rectangle),
    Clear(PlotTarget),
    /// The zoom range changed; the selection on `PlotTarget` is finished.
    Zoomed(PlotTarget),
    /// The user zoomed out past the loaded data; the window should become this.
    /// The zoom range is left alone until the new window is accepted.
    Widen(TimeWindow),
}

#[derive(Debug)]
pub struct DualPlotController {
    detail: GraphGeometry,
    overview: GraphGeometry,
    detail_selection: SelectionDragController,
    overview_selection: SelectionDragController,
    zoom: Option<TimeWindow>,
}

impl DualPlotController {
    pub fn new(detail: GraphGeometry, overview: GraphGeometry) -> Self {
        Self {
            detail,
            overview,
            detail_selection: SelectionDragController::new(),
            overview_selection: SelectionDragController::new(),
            zoom: None,
        }
    }

    pub fn zoom(&self) -> Option<TimeWindow> {
        self.zoom
    }

    /// Range shown by the detail plot when `full` is loaded.
    pub fn visible(&self, full: TimeWindow) -> TimeWindow {
        self.zoom.unwrap_or(full)
    }

    /// Back to the full data extent. Returns whether anything changed.
    pub fn clear_zoom(&mut self) -> bool {
        self.zoom.take().is_some()
    }

    pub fn geometry(&self, target: PlotTarget) -> &GraphGeometry {
        match target {
            PlotTarget::Detail => &self.detail,
            PlotTarget::Overview => &self.overview,
        }
    }

    pub fn detail_scale(&self, full: TimeWindow) -> TimeScale {
        TimeScale::new(self.detail.plot, self.visible(full))
    }

    pub fn render(
        &self,
        store: &MetricSeriesStore,
        markers: &[EventMarker],
        full: TimeWindow,
    ) -> [(PlotTarget, PlotInput); 2] {
        let series = collect_series(store);
        let visible = self.visible(full);

        let detail = PlotInput {
            series: series.clone(),
            x_range: (visible.from_ms(), visible.until_ms()),
            y_extents: y_extents(&series, visible),
            markers: marker_lines(markers, visible),
            legend: true,
        };
        let overview = PlotInput {
            x_range: (full.from_ms(), full.until_ms()),
            y_extents: y_extents(&series, full),
            markers: marker_lines(markers, full),
            legend: false,
            series,
        };

        [
            (PlotTarget::Detail, detail),
            (PlotTarget::Overview, overview),
        ]
    }

    /// Time (ms) under a pointer at `position`, if it is over the detail plot.
    pub fn hovered_time(&self, position: Option<Point>, full: TimeWindow) -> Option<f64> {
        let scale = self.detail_scale(full);

        position
            .filter(|p| self.detail.in_plot(*p))
            .map(|p| scale.time_at(p.x))
    }

    /// Legend entries for a pointer at `position` over the detail plot. Off the
    /// plot, entries carry no value.
    pub fn legend(
        &self,
        store: &MetricSeriesStore,
        position: Option<Point>,
        full: TimeWindow,
    ) -> Vec<LegendEntry> {
        let x_ms = self.hovered_time(position, full);

        store
            .rows()
            .flat_map(|row| {
                row.series.iter().map(move |series| LegendEntry {
                    label: series.name.clone(),
                    axis: row.axis,
                    value: x_ms.and_then(|x| value_at(&series.points, x)),
                })
            })
            .collect()
    }

    pub fn pointer(
        &mut self,
        target: PlotTarget,
        event: PointerEvent,
        full: TimeWindow,
    ) -> Option<Outcome> {
        let basis = match target {
            PlotTarget::Detail => self.visible(full),
            PlotTarget::Overview => full,
        };
        let (selection, geometry) = match target {
            PlotTarget::Detail => (&mut self.detail_selection, &self.detail),
            PlotTarget::Overview => (&mut self.overview_selection, &self.overview),
        };

        match selection.update(event, geometry)? {
            selection::Action::Draw(rect) => Some(Outcome::Draw(target, rect)),
            selection::Action::Clear => Some(Outcome::Clear(target)),
            selection::Action::ZoomIn(rect) => {
                match rect_to_time_range(rect, geometry.plot, basis) {
                    Some(range) => {
                        log::debug!("{target:?} selection zooms to {range:?}");
                        self.zoom = Some(range);
                        Some(Outcome::Zoomed(target))
                    }
                    None => Some(Outcome::Clear(target)),
                }
            }
            selection::Action::ZoomOut => {
                let Some(widened) = zoom_out(basis) else {
                    log::warn!("cannot zoom out of {basis:?}");
                    return None;
                };

                if self.zoom.is_some() && full.covers(&widened) {
                    self.zoom = Some(widened);
                    Some(Outcome::Zoomed(target))
                } else {
                    Some(Outcome::Widen(widened))
                }
            }
        }
    }

    /// Aborts drags on both plots.
    pub fn cancel(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();

        if self.detail_selection.cancel().is_some() {
            outcomes.push(Outcome::Clear(PlotTarget::Detail));
        }
        if self.overview_selection.cancel().is_some() {
            outcomes.push(Outcome::Clear(PlotTarget::Overview));
        }

        outcomes
    }

    /// New layout from the host. Any drag in progress refers to stale
    /// coordinates and is dropped.
    pub fn resize(&mut self, detail: GraphGeometry, overview: GraphGeometry) -> Vec<Outcome> {
        self.detail = detail;
        self.overview = overview;
        self.cancel()
    }
}

fn collect_series(store: &MetricSeriesStore) -> Vec<PlotSeries> {
    store
        .rows()
        .flat_map(|row| row.series.iter().map(move |series| (row.axis, series)))
        .enumerate()
        .map(|(index, (axis, series))| PlotSeries {
            label: series.name.clone(),
            axis,
            color: series_color(index),
            points: series.points.clone(),
        })
        .collect()
}

fn series_color(index: usize) -> Srgb<u8> {
    let hue = (index as f32 * GOLDEN_ANGLE) % 360.0;
    let hsl: Hsl = Hsl::new(hue, 0.65, 0.5);
    let rgb: Srgb = Srgb::from_color(hsl);

    rgb.into_format::<u8>()
}

fn y_extents(series: &[PlotSeries], window: TimeWindow) -> EnumMap<YAxis, Option<(f64, f64)>> {
    let mut extents: EnumMap<YAxis, Option<(f64, f64)>> = EnumMap::default();

    for s in series {
        for &(_, value) in s.points.iter().filter(|(t, _)| window.contains_ms(*t)) {
            let extent = &mut extents[s.axis];
            *extent = Some(match *extent {
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
                None => (value, value),
            });
        }
    }

    extents
}

fn marker_lines(markers: &[EventMarker], window: TimeWindow) -> Vec<i64> {
    markers
        .iter()
        .map(|marker| marker.timestamp_ms)
        .filter(|ts| window.contains_ms(*ts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced_core::mouse;
    use service::Series;

    fn full() -> TimeWindow {
        TimeWindow::new(1000, 2000).unwrap()
    }

    /// Detail plot: x 0..500. Overview: x 0..1000, so 1 px = 1 s of `full`.
    fn controller() -> DualPlotController {
        let detail = Rectangle {
            x: 0.0,
            y: 0.0,
            width: 500.0,
            height: 200.0,
        };
        let overview = Rectangle {
            x: 0.0,
            y: 300.0,
            width: 1000.0,
            height: 50.0,
        };
        DualPlotController::new(
            GraphGeometry::from_plot(detail, 5.0),
            GraphGeometry::from_plot(overview, 5.0),
        )
    }

    fn store() -> MetricSeriesStore {
        let mut store = MetricSeriesStore::new();
        let a = store.add_metric("a", full()).unwrap();
        let b = store.add_metric("b", full()).unwrap();
        store.apply(
            &a,
            full(),
            Ok(vec![Series::new(
                "a",
                vec![(1_000_000, 1.0), (1_500_000, 5.0), (2_000_000, 3.0)],
            )]),
        );
        store.apply(
            &b,
            full(),
            Ok(vec![Series::new("b", vec![(1_000_000, 100.0), (2_000_000, 300.0)])]),
        );
        store.set_axis("b", YAxis::Two);
        store
    }

    fn drag(
        plots: &mut DualPlotController,
        target: PlotTarget,
        (x1, y1): (f32, f32),
        (x2, y2): (f32, f32),
    ) -> Option<Outcome> {
        plots.pointer(
            target,
            PointerEvent::Pressed {
                button: mouse::Button::Left,
                position: Point::new(x1, y1),
            },
            full(),
        );
        plots.pointer(
            target,
            PointerEvent::Moved {
                position: Point::new(x2, y2),
            },
            full(),
        );
        plots.pointer(
            target,
            PointerEvent::Released {
                button: mouse::Button::Left,
                position: Point::new(x2, y2),
            },
            full(),
        )
    }

    #[test]
    fn render_splits_axes_and_keeps_overview_unzoomed() {
        let mut plots = controller();
        plots.zoom = Some(TimeWindow::new(1000, 1400).unwrap());
        let markers = [EventMarker {
            timestamp_ms: 1_600_000,
            label: "deploy".into(),
            id: 1,
        }];

        let [(t1, detail), (t2, overview)] = plots.render(&store(), &markers, full());

        assert_eq!((t1, t2), (PlotTarget::Detail, PlotTarget::Overview));
        assert!(detail.legend);
        assert!(!overview.legend);
        assert_eq!(detail.x_range, (1_000_000, 1_400_000));
        assert_eq!(overview.x_range, (1_000_000, 2_000_000));
        assert_eq!(detail.markers, Vec::<i64>::new());
        assert_eq!(overview.markers, vec![1_600_000]);

        assert_eq!(detail.series[1].axis, YAxis::Two);
        assert_ne!(detail.series[0].color, detail.series[1].color);
        assert_eq!(detail.y_extents[YAxis::One], Some((1.0, 1.0)));
        assert_eq!(detail.y_extents[YAxis::Two], Some((100.0, 100.0)));
        assert_eq!(overview.y_extents[YAxis::One], Some((1.0, 5.0)));
    }

    #[test]
    fn overview_selection_is_absolute() {
        let mut plots = controller();
        plots.zoom = Some(TimeWindow::new(1900, 2000).unwrap());

        assert_eq!(
            drag(&mut plots, PlotTarget::Overview, (100.0, 310.0), (300.0, 340.0)),
            Some(Outcome::Zoomed(PlotTarget::Overview))
        );
        assert_eq!(plots.zoom(), Some(TimeWindow::new(1100, 1300).unwrap()));
    }

    #[test]
    fn detail_selection_composes_with_zoom() {
        let mut plots = controller();

        drag(&mut plots, PlotTarget::Detail, (125.0, 10.0), (250.0, 150.0));
        assert_eq!(plots.zoom(), Some(TimeWindow::new(1250, 1500).unwrap()));

        // 250 s over 500 px: half a second per pixel
        drag(&mut plots, PlotTarget::Detail, (0.0, 10.0), (250.0, 150.0));
        assert_eq!(plots.zoom(), Some(TimeWindow::new(1250, 1375).unwrap()));

        assert!(plots.clear_zoom());
        assert!(!plots.clear_zoom());
        assert_eq!(plots.visible(full()), full());
    }

    #[test]
    fn right_click_widens_zoom_then_window() {
        let mut plots = controller();
        plots.zoom = Some(TimeWindow::new(1400, 1500).unwrap());
        let right_click = PointerEvent::Released {
            button: mouse::Button::Right,
            position: Point::new(100.0, 100.0),
        };

        assert_eq!(
            plots.pointer(PlotTarget::Detail, right_click, full()),
            Some(Outcome::Zoomed(PlotTarget::Detail))
        );
        assert_eq!(plots.zoom(), Some(TimeWindow::new(1200, 1700).unwrap()));

        assert_eq!(
            plots.pointer(PlotTarget::Detail, right_click, full()),
            Some(Outcome::Widen(TimeWindow::new(200, 2700).unwrap()))
        );
        assert_eq!(plots.zoom(), Some(TimeWindow::new(1200, 1700).unwrap()));
    }

    #[test]
    fn zoom_out_beyond_i64_is_ignored() {
        let mut plots = controller();
        let huge = TimeWindow::new(i64::MIN / 2, i64::MAX / 2).unwrap();
        let right_click = PointerEvent::Released {
            button: mouse::Button::Right,
            position: Point::new(100.0, 320.0),
        };

        assert_eq!(plots.pointer(PlotTarget::Overview, right_click, huge), None);
        assert_eq!(plots.zoom(), None);
    }

    #[test]
    fn legend_interpolates_under_pointer() {
        let plots = controller();
        let entries = plots.legend(&store(), Some(Point::new(125.0, 50.0)), full());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, Some(3.0));
        assert_eq!(entries[1].value, Some(150.0));
        assert_eq!(entries[1].axis, YAxis::Two);

        let off_plot = plots.legend(&store(), Some(Point::new(700.0, 50.0)), full());
        assert!(off_plot.iter().all(|e| e.value.is_none()));
    }

    #[test]
    fn resize_drops_drag_in_progress() {
        let mut plots = controller();
        plots.pointer(
            PlotTarget::Detail,
            PointerEvent::Pressed {
                button: mouse::Button::Left,
                position: Point::new(50.0, 50.0),
            },
            full(),
        );

        let detail = *plots.geometry(PlotTarget::Detail);
        let overview = *plots.geometry(PlotTarget::Overview);
        assert_eq!(
            plots.resize(detail, overview),
            vec![Outcome::Clear(PlotTarget::Detail)]
        );
        assert!(plots.cancel().is_empty());
    }
}
