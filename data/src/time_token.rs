//! Time tokens as they appear in dashboard query strings.
//!
//! Two forms are understood:
//!
//! | Form       | Example            | Meaning                              |
//! |------------|--------------------|--------------------------------------|
//! | absolute   | `14:30_20240105`   | wall-clock minute in the user's zone |
//! | relative   | `-3days`           | `now - 3 * 86400` seconds            |
//!
//! The empty string and `-` both mean "now". Absolute tokens are written back
//! with the colon pre-encoded as `%3A`, since they are spliced straight into a
//! query string; the parser accepts either spelling.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::timezone::{UserTimezone, WallClock};

pub const HOUR: i64 = 3_600;
pub const DAY: i64 = 86_400;
pub const WEEK: i64 = 604_800;
/// Fixed 30 days.
pub const MONTH: i64 = 2_592_000;
/// Fixed 356 days.
pub const YEAR: i64 = 30_758_400;

static ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::|%3[Aa])(\d{2})_(\d{4})(\d{2})(\d{2})$")
        .expect("absolute token pattern compiles")
});

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-(\d+)(hours?|days?|weeks?|months?|years?)$")
        .expect("relative token pattern compiles")
});

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid time token: {0:?}")]
    InvalidTimeToken(String),
    #[error("Time out of range: {0}")]
    OutOfRange(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl Unit {
    pub const fn seconds(self) -> i64 {
        match self {
            Unit::Hours => HOUR,
            Unit::Days => DAY,
            Unit::Weeks => WEEK,
            Unit::Months => MONTH,
            Unit::Years => YEAR,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.trim_end_matches('s') {
            "hour" => Some(Unit::Hours),
            "day" => Some(Unit::Days),
            "week" => Some(Unit::Weeks),
            "month" => Some(Unit::Months),
            "year" => Some(Unit::Years),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeToken {
    Now,
    Absolute(WallClock),
    Relative { amount: i64, unit: Unit },
}

impl FromStr for TimeToken {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let invalid = || Error::InvalidTimeToken(token.to_string());

        if token.is_empty() || token == "-" {
            return Ok(TimeToken::Now);
        }

        if let Some(caps) = ABSOLUTE.captures(token) {
            let field = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid());

            return Ok(TimeToken::Absolute(WallClock {
                hour: field(1)?,
                minute: field(2)?,
                year: caps[3].parse::<i32>().map_err(|_| invalid())?,
                month: field(4)?,
                day: field(5)?,
            }));
        }

        if let Some(caps) = RELATIVE.captures(token) {
            let amount = caps[1].parse::<i64>().map_err(|_| invalid())?;
            let unit = Unit::from_suffix(&caps[2]).ok_or_else(invalid)?;

            return Ok(TimeToken::Relative { amount, unit });
        }

        Err(invalid())
    }
}

impl TimeToken {
    /// Epoch seconds this token denotes, given the current instant.
    pub fn resolve(&self, tz: UserTimezone, now: i64) -> Result<i64, Error> {
        match *self {
            TimeToken::Now => Ok(now),
            TimeToken::Absolute(clock) => tz
                .instant_from(clock)
                .ok_or_else(|| Error::InvalidTimeToken(format_clock(clock, ":"))),
            TimeToken::Relative { amount, unit } => amount
                .checked_mul(unit.seconds())
                .and_then(|offset| now.checked_sub(offset))
                .ok_or(Error::OutOfRange(amount)),
        }
    }
}

/// Parses `token` against the current wall clock.
pub fn parse(token: &str, tz: UserTimezone) -> Result<i64, Error> {
    parse_at(token, tz, tz.now())
}

/// Parses `token` with an explicit "now", in epoch seconds.
pub fn parse_at(token: &str, tz: UserTimezone, now: i64) -> Result<i64, Error> {
    token.parse::<TimeToken>()?.resolve(tz, now)
}

/// Renders `instant` as `HH%3AMM_YYYYMMDD` in the given zone.
pub fn format(instant: i64, tz: UserTimezone) -> Result<String, Error> {
    tz.wall_clock(instant)
        .map(|clock| format_clock(clock, "%3A"))
        .ok_or(Error::OutOfRange(instant))
}

fn format_clock(clock: WallClock, colon: &str) -> String {
    format!(
        "{:02}{colon}{:02}_{:04}{:02}{:02}",
        clock.hour, clock.minute, clock.year, clock.month, clock.day
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NOW: i64 = 1_704_465_000; // 2024-01-05 14:30:00 UTC
    const UTC: UserTimezone = UserTimezone::Utc;

    #[test]
    fn empty_and_dash_mean_now() {
        assert_eq!(parse_at("", UTC, NOW), Ok(NOW));
        assert_eq!(parse_at("-", UTC, NOW), Ok(NOW));
        assert_eq!(parse_at("  ", UTC, NOW), Ok(NOW));
    }

    #[test]
    fn absolute_tokens_in_both_spellings() {
        assert_eq!(parse_at("14:30_20240105", UTC, 0), Ok(NOW));
        assert_eq!(parse_at("14%3A30_20240105", UTC, 0), Ok(NOW));
        assert_eq!(parse_at("9:05_20240105", UTC, 0), Ok(NOW - 5 * HOUR - 25 * 60));
    }

    #[test]
    fn relative_units_use_fixed_lengths() {
        assert_eq!(parse_at("-2hours", UTC, NOW), Ok(NOW - 2 * 3_600));
        assert_eq!(parse_at("-1day", UTC, NOW), Ok(NOW - 86_400));
        assert_eq!(parse_at("-3weeks", UTC, NOW), Ok(NOW - 3 * 604_800));
        assert_eq!(parse_at("-1months", UTC, NOW), Ok(NOW - 2_592_000));
        assert_eq!(parse_at("-2years", UTC, NOW), Ok(NOW - 2 * 30_758_400));
    }

    #[test]
    fn malformed_tokens_are_errors() {
        for token in ["yesterday", "-3fortnights", "14:30", "25:00_20240105", "-days", "3days"] {
            assert_eq!(
                parse_at(token, UTC, NOW),
                Err(Error::InvalidTimeToken(token.to_string())),
                "{token}"
            );
        }
    }

    #[test]
    fn impossible_calendar_dates_are_rejected() {
        assert!(matches!(
            parse_at("10:00_20240231", UTC, NOW),
            Err(Error::InvalidTimeToken(_))
        ));
    }

    #[test]
    fn format_pads_and_encodes_colon() {
        assert_eq!(format(NOW, UTC).unwrap(), "14%3A30_20240105");
        assert_eq!(format(1_704_416_700, UTC).unwrap(), "01%3A05_20240105");
    }

    #[test]
    fn huge_relative_offsets_overflow_cleanly() {
        assert_eq!(
            parse_at("-999999999999999years", UTC, NOW),
            Err(Error::OutOfRange(999_999_999_999_999))
        );
    }

    proptest! {
        #[test]
        fn absolute_roundtrip_is_stable(
            hour in 0u32..24,
            minute in 0u32..60,
            year in 1971i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let token = format!("{hour:02}:{minute:02}_{year:04}{month:02}{day:02}");
            let parsed = parse_at(&token, UTC, NOW).unwrap();
            let again = parse_at(&format(parsed, UTC).unwrap(), UTC, NOW).unwrap();
            prop_assert_eq!(again, parsed);
            prop_assert_eq!(parsed % 60, 0);
        }

        #[test]
        fn relative_tokens_offset_from_now(amount in 0i64..500, unit in 0usize..5) {
            let (suffix, seconds) = [
                ("hours", HOUR),
                ("days", DAY),
                ("weeks", WEEK),
                ("months", MONTH),
                ("years", YEAR),
            ][unit];
            let token = format!("-{amount}{suffix}");
            let parsed = parse_at(&token, UTC, NOW).unwrap();
            prop_assert!((parsed - (NOW - amount * seconds)).abs() <= 1);
        }
    }
}
