use serde::{Deserialize, Serialize};

use crate::config::timezone::UserTimezone;
use crate::time_token;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Token(#[from] time_token::Error),
    #[error("Empty time window: from {from} is not before until {until}")]
    Empty { from: i64, until: i64 },
}

/// Half-open span of epoch seconds, `from < until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: i64,
    pub until: i64,
}

impl TimeWindow {
    pub fn new(from: i64, until: i64) -> Result<Self, Error> {
        if from < until {
            Ok(Self { from, until })
        } else {
            Err(Error::Empty { from, until })
        }
    }

    /// Resolves the text of the from/until fields. An empty `until` is "now".
    pub fn from_tokens(
        from: &str,
        until: &str,
        tz: UserTimezone,
        now: i64,
    ) -> Result<Self, Error> {
        let from = time_token::parse_at(from, tz, now)?;
        let until = time_token::parse_at(until, tz, now)?;

        Self::new(from, until)
    }

    /// Absolute tokens for both ends, ready for a query string.
    pub fn tokens(&self, tz: UserTimezone) -> Result<(String, String), time_token::Error> {
        Ok((
            time_token::format(self.from, tz)?,
            time_token::format(self.until, tz)?,
        ))
    }

    pub fn span(&self) -> i64 {
        self.until - self.from
    }

    pub fn from_ms(&self) -> i64 {
        self.from * 1000
    }

    pub fn until_ms(&self) -> i64 {
        self.until * 1000
    }

    pub fn contains_ms(&self, timestamp_ms: i64) -> bool {
        (self.from_ms()..=self.until_ms()).contains(&timestamp_ms)
    }

    /// Whether `other` lies entirely inside this window.
    pub fn covers(&self, other: &TimeWindow) -> bool {
        self.from <= other.from && other.until <= self.until
    }
}
