//! Pointer input as delivered by the host.
//!
//! Hosts differ in how they report buttons and coordinates. Rather than
//! branching on the host inside the widget, the host implements [`Pointer`]
//! for its raw event type and the widget only ever sees [`PointerEvent`].

use iced_core::{Point, mouse};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { button: mouse::Button, position: Point },
    Moved { position: Point },
    Released { button: mouse::Button, position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Pressed { position, .. }
            | PointerEvent::Moved { position }
            | PointerEvent::Released { position, .. } => position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Down,
    Move,
    Up,
}

/// Capability interface a host exposes for its raw pointer events.
pub trait Pointer {
    type Event;

    fn phase(&self, event: &Self::Event) -> Option<Phase>;

    /// Button involved in a down/up event, in client terms.
    fn button(&self, event: &Self::Event) -> Option<mouse::Button>;

    /// Position in page pixels.
    fn position(&self, event: &Self::Event) -> Point;

    fn normalize(&self, event: &Self::Event) -> Option<PointerEvent> {
        let position = self.position(event);

        match self.phase(event)? {
            Phase::Move => Some(PointerEvent::Moved { position }),
            Phase::Down => Some(PointerEvent::Pressed {
                button: self.button(event)?,
                position,
            }),
            Phase::Up => Some(PointerEvent::Released {
                button: self.button(event)?,
                position,
            }),
        }
    }
}
