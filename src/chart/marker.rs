use service::EventMarker;

use super::range::TimeScale;

/// Marker closest to `pixel_x` on the horizontal axis, if it lies within
/// `threshold` pixels (linear distance).
pub fn nearest<'a>(
    pixel_x: f32,
    markers: &'a [EventMarker],
    scale: &TimeScale,
    threshold: f32,
) -> Option<&'a EventMarker> {
    markers
        .iter()
        .map(|marker| ((scale.x_of(marker.timestamp_ms) - pixel_x).abs(), marker))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .filter(|(distance, _)| *distance < threshold)
        .map(|(_, marker)| marker)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tooltip {
    Show { label: String, x: f32 },
    Hide,
}

/// Tracks which marker's tooltip is showing so it is only redrawn when the
/// nearest marker changes.
#[derive(Debug, Default)]
pub struct MarkerHover {
    current: Option<u64>,
}

impl MarkerHover {
    pub fn update(&mut self, found: Option<&EventMarker>, scale: &TimeScale) -> Option<Tooltip> {
        let id = found.map(|marker| marker.id);
        if id == self.current {
            return None;
        }
        self.current = id;

        Some(match found {
            Some(marker) => Tooltip::Show {
                label: marker.label.clone(),
                x: scale.x_of(marker.timestamp_ms),
            },
            None => Tooltip::Hide,
        })
    }

    pub fn reset(&mut self) -> Option<Tooltip> {
        self.current.take().map(|_| Tooltip::Hide)
    }
}
