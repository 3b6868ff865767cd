use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Zone in which absolute time tokens are read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserTimezone {
    Utc,
    #[default]
    Local,
}

/// Calendar fields of an instant, as shown on a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl UserTimezone {
    /// Current instant in epoch seconds.
    pub fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// Epoch seconds of a wall-clock minute in this zone.
    ///
    /// Ambiguous local times resolve to the earlier instant; times skipped by a
    /// DST transition yield `None`.
    pub fn instant_from(&self, clock: WallClock) -> Option<i64> {
        match self {
            UserTimezone::Utc => Self::resolve(&chrono::Utc, clock),
            UserTimezone::Local => Self::resolve(&chrono::Local, clock),
        }
    }

    fn resolve<Tz: TimeZone>(tz: &Tz, clock: WallClock) -> Option<i64> {
        tz.with_ymd_and_hms(clock.year, clock.month, clock.day, clock.hour, clock.minute, 0)
            .earliest()
            .map(|dt| dt.timestamp())
    }

    /// Wall-clock fields of `timestamp` (epoch seconds) in this zone.
    pub fn wall_clock(&self, timestamp: i64) -> Option<WallClock> {
        let datetime = DateTime::from_timestamp(timestamp, 0)?;

        let naive = match self {
            UserTimezone::Utc => datetime.naive_utc(),
            UserTimezone::Local => datetime.with_timezone(&chrono::Local).naive_local(),
        };

        Some(Self::fields(&naive))
    }

    fn fields(naive: &NaiveDateTime) -> WallClock {
        WallClock {
            year: naive.year(),
            month: naive.month(),
            day: naive.day(),
            hour: naive.hour(),
            minute: naive.minute(),
        }
    }

    /// Format a hovered timestamp for the legend header.
    /// Uses seconds precision when the visible span is under an hour.
    pub fn format_crosshair_timestamp(&self, timestamp_ms: i64, span_ms: i64) -> String {
        let format_str = if span_ms < 3_600_000 {
            "%H:%M:%S"
        } else {
            "%a %b %-d %H:%M"
        };

        match self {
            UserTimezone::Utc => match chrono::Utc.timestamp_millis_opt(timestamp_ms).single() {
                Some(dt) => dt.format(format_str).to_string(),
                None => timestamp_ms.to_string(),
            },
            UserTimezone::Local => match chrono::Local.timestamp_millis_opt(timestamp_ms).single()
            {
                Some(dt) => dt.format(format_str).to_string(),
                None => timestamp_ms.to_string(),
            },
        }
    }
}

impl fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserTimezone::Utc => write!(f, "UTC"),
            UserTimezone::Local => {
                let local_offset = chrono::Local::now().offset().local_minus_utc();
                let hours = local_offset / 3600;
                let minutes = (local_offset % 3600).abs() / 60;
                write!(f, "Local (UTC {hours:+03}:{minutes:02})")
            }
        }
    }
}

impl<'de> Deserialize<'de> for UserTimezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let timezone_str = String::deserialize(deserializer)?;
        match timezone_str.to_lowercase().as_str() {
            "utc" => Ok(UserTimezone::Utc),
            "local" => Ok(UserTimezone::Local),
            _ => Err(serde::de::Error::custom("Invalid UserTimezone")),
        }
    }
}

impl Serialize for UserTimezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            UserTimezone::Utc => serializer.serialize_str("UTC"),
            UserTimezone::Local => serializer.serialize_str("Local"),
        }
    }
}
