//! One graph container: the metric rows, the time window fields, and the
//! coupled detail and overview plots.

use std::time::Duration;

use data::{
    Applied, Config, EventSet, EventTicket, FetchTicket, InternalError, MetricRow,
    MetricSeriesStore, TimeWindow,
};
use iced_core::{Point, Rectangle};
use service::{EventMarker, EventQuery, MetricQuery, Series};
use uuid::Uuid;

use crate::chart::dual_plot::Outcome;
use crate::chart::legend::{HoverThrottle, LegendEntry};
use crate::chart::marker::{self, MarkerHover, Tooltip};
use crate::chart::{DualPlotController, GraphGeometry, PlotInput, PlotTarget};
use crate::task::Fetch;
use crate::widget::pointer::PointerEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    FromEdited(String),
    UntilEdited(String),
    /// Resolve the from/until fields into a new window.
    ApplyWindow,
    SetWindow(TimeWindow),
    AddMetric(String),
    RemoveMetric(String),
    ToggleAxis(String),
    Refresh,
    MetricFetched(FetchTicket, Result<Vec<Series>, String>),
    EventsFetched(EventTicket, Result<Vec<EventMarker>, String>),
    Pointer(PlotTarget, PointerEvent),
    Hover(Point),
    HoverLeft,
    LegendTick,
    Escape,
    /// New plot boxes for the detail plot and the overview strip.
    Resized {
        detail: Rectangle,
        overview: Rectangle,
    },
    ClearZoom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Draw(PlotTarget, PlotInput),
    ShowSelection(PlotTarget, Rectangle),
    ClearSelection(PlotTarget),
    ShowTooltip { label: String, x: f32 },
    HideTooltip,
    /// Legend for the hovered time; `time` is `None` off the plot.
    SetLegend {
        time: Option<String>,
        entries: Vec<LegendEntry>,
    },
    /// Deliver `Message` back after the delay.
    Schedule(Duration, Message),
    Fetch(Fetch),
    SetTimeFields { from: String, until: String },
    ReportError(InternalError),
}

pub struct Dashboard {
    id: Uuid,
    config: Config,
    from_text: String,
    until_text: String,
    window: TimeWindow,
    store: MetricSeriesStore,
    plots: DualPlotController,
    events: EventSet,
    marker_hover: MarkerHover,
    hover: HoverThrottle,
    clock: fn() -> i64,
}

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

impl Dashboard {
    /// Builds a dashboard over the configured default window. The returned
    /// actions draw the empty plots and request the window's events.
    pub fn new(
        config: Config,
        detail: Rectangle,
        overview: Rectangle,
    ) -> Result<(Self, Vec<Action>), InternalError> {
        Self::with_clock(config, detail, overview, system_clock)
    }

    pub fn with_clock(
        config: Config,
        detail: Rectangle,
        overview: Rectangle,
        clock: fn() -> i64,
    ) -> Result<(Self, Vec<Action>), InternalError> {
        let window = TimeWindow::from_tokens(
            &config.default_from,
            &config.default_until,
            config.timezone,
            clock(),
        )
        .map_err(|err| InternalError::Config(err.to_string()))?;

        let padding = config.sensitive_padding;
        let mut dashboard = Self {
            id: Uuid::new_v4(),
            from_text: config.default_from.clone(),
            until_text: config.default_until.clone(),
            window,
            store: MetricSeriesStore::new(),
            plots: DualPlotController::new(
                GraphGeometry::from_plot(detail, padding),
                GraphGeometry::from_plot(overview, padding),
            ),
            events: EventSet::new(),
            marker_hover: MarkerHover::default(),
            hover: HoverThrottle::new(config.legend_delay()),
            config,
            clock,
        };
        log::info!(
            "dashboard {} starts on {:?} ({})",
            dashboard.id,
            window,
            dashboard.config.timezone
        );

        let mut actions = dashboard.fetch_events();
        actions.extend(dashboard.render());

        Ok((dashboard, actions))
    }

    pub fn update(&mut self, message: Message) -> Vec<Action> {
        match message {
            Message::FromEdited(text) => {
                self.from_text = text;
                vec![]
            }
            Message::UntilEdited(text) => {
                self.until_text = text;
                vec![]
            }
            Message::ApplyWindow => {
                match TimeWindow::from_tokens(
                    &self.from_text,
                    &self.until_text,
                    self.config.timezone,
                    (self.clock)(),
                ) {
                    Ok(window) => self.change_window(window, false),
                    Err(err) => {
                        log::warn!(
                            "rejecting time window {:?} .. {:?}: {err}",
                            self.from_text,
                            self.until_text
                        );
                        vec![Action::ReportError(InternalError::Window(err.to_string()))]
                    }
                }
            }
            Message::SetWindow(window) => self.change_window(window, true),
            Message::AddMetric(name) => match self.store.add_metric(&name, self.window) {
                Some(ticket) => {
                    log::debug!("added metric {name}");
                    let mut actions = self.fetch_metrics(vec![ticket]);
                    actions.extend(self.render());
                    actions
                }
                None => vec![],
            },
            Message::RemoveMetric(name) => {
                if self.store.remove_metric(&name) {
                    log::debug!("removed metric {name}");
                    self.render()
                } else {
                    vec![]
                }
            }
            Message::ToggleAxis(name) => match self.store.toggle_axis(&name) {
                Some(axis) => {
                    log::debug!("{name} moved to axis {axis}");
                    self.render()
                }
                None => vec![],
            },
            Message::Refresh => {
                let tickets = self.store.refresh_all(self.window);
                let mut actions = self.fetch_metrics(tickets);
                actions.extend(self.fetch_events());
                actions
            }
            Message::MetricFetched(ticket, result) => {
                let reason = result.as_ref().err().cloned();

                match self.store.apply(&ticket, self.window, result) {
                    Applied::Updated => self.render(),
                    Applied::Failed => {
                        let mut actions = self.render();
                        if let Some(reason) = reason {
                            actions.push(Action::ReportError(InternalError::Fetch(format!(
                                "{}: {reason}",
                                ticket.metric
                            ))));
                        }
                        actions
                    }
                    Applied::Stale => vec![],
                }
            }
            Message::EventsFetched(ticket, result) => {
                let reason = result.as_ref().err().cloned();

                match self.events.apply(&ticket, self.window, result) {
                    Applied::Updated => self.render(),
                    Applied::Failed => reason
                        .map(|reason| Action::ReportError(InternalError::Fetch(reason)))
                        .into_iter()
                        .collect(),
                    Applied::Stale => vec![],
                }
            }
            Message::Pointer(target, event) => {
                match self.plots.pointer(target, event, self.window) {
                    Some(outcome) => self.outcome(outcome),
                    None => vec![],
                }
            }
            Message::Hover(position) => {
                let mut actions = Vec::new();

                if let Some(delay) = self.hover.hover(position) {
                    actions.push(Action::Schedule(delay, Message::LegendTick));
                }
                actions.extend(self.hover_markers(position));

                actions
            }
            Message::HoverLeft => {
                self.hover.leave();
                let mut actions = Vec::new();

                if !self.hover.is_pending() {
                    actions.push(self.legend(None));
                }
                actions.extend(self.hide_tooltip());

                actions
            }
            Message::LegendTick => {
                let position = self.hover.fire();
                vec![self.legend(position)]
            }
            Message::Escape => self
                .plots
                .cancel()
                .into_iter()
                .flat_map(|outcome| self.outcome(outcome))
                .collect(),
            Message::Resized { detail, overview } => {
                let padding = self.config.sensitive_padding;
                let cleared = self.plots.resize(
                    GraphGeometry::from_plot(detail, padding),
                    GraphGeometry::from_plot(overview, padding),
                );

                let mut actions: Vec<Action> = cleared
                    .into_iter()
                    .flat_map(|outcome| self.outcome(outcome))
                    .collect();
                actions.extend(self.render());
                actions
            }
            Message::ClearZoom => {
                if self.plots.clear_zoom() {
                    log::debug!("zoom cleared");
                    let mut actions: Vec<Action> = self.hide_tooltip().into_iter().collect();
                    actions.extend(self.render());
                    actions
                } else {
                    vec![]
                }
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn zoom(&self) -> Option<TimeWindow> {
        self.plots.zoom()
    }

    pub fn time_fields(&self) -> (&str, &str) {
        (&self.from_text, &self.until_text)
    }

    pub fn rows(&self) -> impl Iterator<Item = &MetricRow> {
        self.store.rows()
    }

    pub fn row(&self, name: &str) -> Option<&MetricRow> {
        self.store.get(name)
    }

    pub fn markers(&self) -> &[EventMarker] {
        self.events.markers()
    }

    fn render(&self) -> Vec<Action> {
        self.plots
            .render(&self.store, self.events.markers(), self.window)
            .into_iter()
            .map(|(target, input)| Action::Draw(target, input))
            .collect()
    }

    fn outcome(&mut self, outcome: Outcome) -> Vec<Action> {
        match outcome {
            Outcome::Draw(target, rect) => vec![Action::ShowSelection(target, rect)],
            Outcome::Clear(target) => vec![Action::ClearSelection(target)],
            Outcome::Zoomed(target) => {
                let mut actions = vec![Action::ClearSelection(target)];
                actions.extend(self.hide_tooltip());
                actions.extend(self.render());
                actions
            }
            Outcome::Widen(window) => {
                log::debug!("zooming out past loaded data to {window:?}");
                self.change_window(window, true)
            }
        }
    }

    /// Moves to `window` and refetches everything. A window that cannot be
    /// written as query tokens is rejected and nothing changes.
    fn change_window(&mut self, window: TimeWindow, sync_fields: bool) -> Vec<Action> {
        let (from, until) = match window.tokens(self.config.timezone) {
            Ok(tokens) => tokens,
            Err(err) => {
                log::warn!("rejecting time window {window:?}: {err}");
                return vec![Action::ReportError(InternalError::Window(err.to_string()))];
            }
        };

        log::info!("time window {:?} -> {:?}", self.window, window);
        let mut actions = Vec::new();
        if sync_fields {
            self.from_text = from.clone();
            self.until_text = until.clone();
            actions.push(Action::SetTimeFields { from, until });
        }

        self.window = window;
        self.plots.clear_zoom();
        actions.extend(self.hide_tooltip());

        let tickets = self.store.refresh_all(window);
        actions.extend(self.fetch_metrics(tickets));
        actions.extend(self.fetch_events());
        actions.extend(self.render());
        actions
    }

    /// Marker positions move with the range, so a showing tooltip is stale.
    fn hide_tooltip(&mut self) -> Option<Action> {
        self.marker_hover.reset().map(|_| Action::HideTooltip)
    }

    fn query_tokens(&self) -> Result<(String, String), InternalError> {
        self.window
            .tokens(self.config.timezone)
            .map_err(|err| InternalError::Window(err.to_string()))
    }

    fn fetch_metrics(&self, tickets: Vec<FetchTicket>) -> Vec<Action> {
        if tickets.is_empty() {
            return vec![];
        }

        match self.query_tokens() {
            Ok((from, until)) => tickets
                .into_iter()
                .map(|ticket| {
                    let query = MetricQuery {
                        target: ticket.metric.clone(),
                        from: from.clone(),
                        until: until.clone(),
                    };
                    Action::Fetch(Fetch::Metric { ticket, query })
                })
                .collect(),
            Err(err) => vec![Action::ReportError(err)],
        }
    }

    fn fetch_events(&mut self) -> Vec<Action> {
        let ticket = self.events.request(self.window);

        match self.query_tokens() {
            Ok((from, until)) => {
                let query = EventQuery {
                    from,
                    until,
                    tags: self.config.event_tags.clone(),
                };
                vec![Action::Fetch(Fetch::Events { ticket, query })]
            }
            Err(err) => vec![Action::ReportError(err)],
        }
    }

    fn legend(&self, position: Option<Point>) -> Action {
        let span_ms = self.plots.visible(self.window).span() * 1000;
        let time = self
            .plots
            .hovered_time(position, self.window)
            .map(|x_ms| {
                self.config
                    .timezone
                    .format_crosshair_timestamp(x_ms.round() as i64, span_ms)
            });

        Action::SetLegend {
            time,
            entries: self.plots.legend(&self.store, position, self.window),
        }
    }

    fn hover_markers(&mut self, position: Point) -> Option<Action> {
        let scale = self.plots.detail_scale(self.window);
        let found = if self.plots.geometry(PlotTarget::Detail).in_plot(position) {
            marker::nearest(
                position.x,
                self.events.markers(),
                &scale,
                self.config.marker_threshold.into(),
            )
        } else {
            None
        };

        self.marker_hover
            .update(found, &scale)
            .map(|tooltip| match tooltip {
                Tooltip::Show { label, x } => Action::ShowTooltip { label, x },
                Tooltip::Hide => Action::HideTooltip,
            })
    }
}
