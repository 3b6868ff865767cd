//! Drag-to-select state machine.
//!
//! ```text
//! Idle --press(primary, in zone)--> Dragging --move--> Dragging
//! Dragging --release--> Idle   (commit, or discard if nothing of it lands in the plot)
//! Dragging --escape/resize--> Idle   (abort)
//! Idle --release(secondary, in zone)--> Idle   (zoom out)
//! ```

use iced_core::{Point, Rectangle, mouse};

use super::geometry::GraphGeometry;
use super::range::normalize;
use crate::widget::pointer::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum State {
    #[default]
    Idle,
    Dragging { start: Point, current: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Draw the selection rectangle.
    Draw(Rectangle),
    /// Remove the selection rectangle; nothing else happens.
    Clear,
    /// Selection committed; the rectangle is already clamped into the plot box.
    /// The drawn rectangle should be removed as well.
    ZoomIn(Rectangle),
    ZoomOut,
}

#[derive(Debug, Default)]
pub struct SelectionDragController {
    state: State,
}

impl SelectionDragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging { .. })
    }

    pub fn update(&mut self, event: PointerEvent, geometry: &GraphGeometry) -> Option<Action> {
        match (self.state, event) {
            (
                State::Idle,
                PointerEvent::Pressed {
                    button: mouse::Button::Left,
                    position,
                },
            ) if geometry.in_sensitive_zone(position) => {
                self.state = State::Dragging {
                    start: position,
                    current: position,
                };
                Some(Action::Draw(normalize(position, position)))
            }
            (State::Dragging { start, .. }, PointerEvent::Moved { position }) => {
                self.state = State::Dragging {
                    start,
                    current: position,
                };
                Some(Action::Draw(normalize(start, position)))
            }
            (
                State::Dragging { start, .. },
                PointerEvent::Released {
                    button: mouse::Button::Left,
                    position,
                },
            ) => {
                self.state = State::Idle;

                if !geometry.in_sensitive_zone(position) {
                    log::debug!("selection released outside the graph, discarded");
                    return Some(Action::Clear);
                }

                match clamp_into(normalize(start, position), geometry.plot) {
                    Some(rect) => Some(Action::ZoomIn(rect)),
                    None => Some(Action::Clear),
                }
            }
            (
                State::Idle,
                PointerEvent::Released {
                    button: mouse::Button::Right,
                    position,
                },
            ) if geometry.in_sensitive_zone(position) => Some(Action::ZoomOut),
            _ => None,
        }
    }

    /// Aborts an in-progress drag.
    pub fn cancel(&mut self) -> Option<Action> {
        if self.is_dragging() {
            self.state = State::Idle;
            Some(Action::Clear)
        } else {
            None
        }
    }
}

/// Intersection of `rect` with `plot`, or `None` when it has no area.
fn clamp_into(rect: Rectangle, plot: Rectangle) -> Option<Rectangle> {
    let left = rect.x.clamp(plot.x, plot.x + plot.width);
    let right = (rect.x + rect.width).clamp(plot.x, plot.x + plot.width);
    let top = rect.y.clamp(plot.y, plot.y + plot.height);
    let bottom = (rect.y + rect.height).clamp(plot.y, plot.y + plot.height);

    (right > left && bottom > top).then(|| Rectangle {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    })
}
