//! Zooming over a server-rendered graph image.
//!
//! The image URL is the whole state: its `from`/`until` parameters say what is
//! shown, and zooming means rewriting them and loading the new image. Every
//! other parameter (size, fonts, targets) is left untouched and in place.

use data::{Config, InternalError, PlotMargins, TimeWindow, UserTimezone};
use iced_core::Rectangle;
use service::graph_url;
use uuid::Uuid;

use super::pointer::PointerEvent;
use crate::chart::geometry::GraphGeometry;
use crate::chart::range::{rect_to_time_range, zoom_out};
use crate::chart::selection::{self, SelectionDragController};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// The image finished loading and occupies these page bounds.
    Loaded(Rectangle),
    Resized(Rectangle),
    Pointer(PointerEvent),
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadImage(String),
    ShowSelection(Rectangle),
    ClearSelection,
    SetTimeFields { from: String, until: String },
    ReportError(InternalError),
}

pub struct ImageGraph {
    id: Uuid,
    url: String,
    window: TimeWindow,
    timezone: UserTimezone,
    margins: PlotMargins,
    padding: f32,
    geometry: Option<GraphGeometry>,
    selection: SelectionDragController,
}

impl ImageGraph {
    /// Reads the window from the URL's `from`/`until`, falling back to the
    /// configured defaults for a missing parameter.
    pub fn new(url: impl Into<String>, config: &Config, now: i64) -> Result<Self, InternalError> {
        let url = url.into();

        let from = graph_url::param(&url, "from").unwrap_or(config.default_from.as_str());
        let until = graph_url::param(&url, "until").unwrap_or(config.default_until.as_str());
        let window = TimeWindow::from_tokens(from, until, config.timezone, now)
            .map_err(|err| InternalError::Window(err.to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            url,
            window,
            timezone: config.timezone,
            margins: config.margins,
            padding: config.sensitive_padding,
            geometry: None,
            selection: SelectionDragController::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn update(&mut self, message: Message) -> Vec<Action> {
        match message {
            Message::Loaded(bounds) => {
                self.measure(bounds);
                vec![]
            }
            Message::Resized(bounds) => {
                let cleared = self.selection.cancel().map(|_| Action::ClearSelection);
                self.measure(bounds);
                cleared.into_iter().collect()
            }
            Message::Escape => self
                .selection
                .cancel()
                .map(|_| Action::ClearSelection)
                .into_iter()
                .collect(),
            Message::Pointer(event) => {
                let Some(geometry) = self.geometry else {
                    return vec![];
                };

                match self.selection.update(event, &geometry) {
                    Some(selection::Action::Draw(rect)) => vec![Action::ShowSelection(rect)],
                    Some(selection::Action::Clear) => vec![Action::ClearSelection],
                    Some(selection::Action::ZoomIn(rect)) => {
                        let mut actions = vec![Action::ClearSelection];
                        if let Some(window) = rect_to_time_range(rect, geometry.plot, self.window)
                        {
                            actions.extend(self.reload(window));
                        }
                        actions
                    }
                    Some(selection::Action::ZoomOut) => match zoom_out(self.window) {
                        Some(window) => self.reload(window),
                        None => vec![Action::ReportError(InternalError::Window(format!(
                            "cannot zoom out of {:?}",
                            self.window
                        )))],
                    },
                    None => vec![],
                }
            }
        }
    }

    fn measure(&mut self, bounds: Rectangle) {
        self.geometry = GraphGeometry::from_image(bounds, self.margins, self.padding);

        if self.geometry.is_none() {
            log::warn!(
                "graph {} is too small for its margins ({}x{})",
                self.id,
                bounds.width,
                bounds.height
            );
        }
    }

    fn reload(&mut self, window: TimeWindow) -> Vec<Action> {
        let (from, until) = match window.tokens(self.timezone) {
            Ok(tokens) => tokens,
            Err(err) => {
                return vec![Action::ReportError(InternalError::Window(err.to_string()))];
            }
        };

        log::info!("graph {} zooms to {window:?}", self.id);
        self.window = window;
        self.url = graph_url::with_window(&self.url, &from, &until);

        vec![
            Action::SetTimeFields { from, until },
            Action::LoadImage(self.url.clone()),
        ]
    }
}
