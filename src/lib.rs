//! Interactive time-series graphs for a metrics dashboard.
//!
//! [`screen::dashboard::Dashboard`] drives a detail plot and an overview strip
//! over data fetched from a graph service; [`widget::image_graph::ImageGraph`]
//! zooms a server-rendered graph image by rewriting its URL. Both are plain
//! state machines: they take messages and answer with actions for the host.

pub mod chart;
pub mod logger;
pub mod screen;
pub mod task;
pub mod widget;

pub use data::{Config, InternalError, TimeWindow, UserTimezone, YAxis};
pub use service::{DataSource, EventMarker, Series};
