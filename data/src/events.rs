use service::EventMarker;

use crate::store::Applied;
use crate::window::TimeWindow;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventTicket {
    pub window: TimeWindow,
    generation: u64,
}

/// Annotation events for the current window. Each successful fetch replaces
/// the whole set.
#[derive(Debug, Default)]
pub struct EventSet {
    markers: Vec<EventMarker>,
    generation: u64,
}

impl EventSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, window: TimeWindow) -> EventTicket {
        self.generation += 1;

        EventTicket {
            window,
            generation: self.generation,
        }
    }

    pub fn apply(
        &mut self,
        ticket: &EventTicket,
        window: TimeWindow,
        result: Result<Vec<EventMarker>, String>,
    ) -> Applied {
        if ticket.generation != self.generation || ticket.window != window {
            log::debug!("dropping stale event response (generation {})", ticket.generation);
            return Applied::Stale;
        }

        match result {
            Ok(mut markers) => {
                markers.sort_by_key(|m| m.timestamp_ms);
                self.markers = markers;
                Applied::Updated
            }
            Err(reason) => {
                log::warn!("event fetch failed: {reason}");
                Applied::Failed
            }
        }
    }

    pub fn markers(&self) -> &[EventMarker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: u64, ts: i64) -> EventMarker {
        EventMarker {
            timestamp_ms: ts,
            label: format!("event {id}"),
            id,
        }
    }

    #[test]
    fn replaces_rather_than_merges() {
        let window = TimeWindow::new(0, 10).unwrap();
        let mut events = EventSet::new();

        let first = events.request(window);
        events.apply(&first, window, Ok(vec![marker(1, 5000), marker(2, 1000)]));
        assert_eq!(events.markers(), &[marker(2, 1000), marker(1, 5000)]);

        let second = events.request(window);
        events.apply(&second, window, Ok(vec![marker(3, 2000)]));
        assert_eq!(events.markers(), &[marker(3, 2000)]);
    }

    #[test]
    fn superseded_or_failed_responses_keep_current_markers() {
        let window = TimeWindow::new(0, 10).unwrap();
        let mut events = EventSet::new();

        let old = events.request(window);
        let current = events.request(window);
        assert_eq!(events.apply(&current, window, Ok(vec![marker(1, 1)])), Applied::Updated);
        assert_eq!(events.apply(&old, window, Ok(vec![])), Applied::Stale);

        let failing = events.request(window);
        assert_eq!(events.apply(&failing, window, Err("down".into())), Applied::Failed);
        assert_eq!(events.markers(), &[marker(1, 1)]);
    }
}
