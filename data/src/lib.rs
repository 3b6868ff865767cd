pub mod config;
pub mod events;
pub mod log;
pub mod store;
pub mod time_token;
pub mod window;

pub use config::timezone::UserTimezone;
pub use config::{Config, MarkerThreshold, PlotMargins};
pub use events::{EventSet, EventTicket};
pub use store::{Applied, FetchTicket, MetricRow, MetricSeriesStore, RowStatus, YAxis};
pub use window::TimeWindow;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Time window error: {0}")]
    Window(String),
}
