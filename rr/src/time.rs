//! Clock values and ISO-8601 helpers
//!
//! The prompt talks about the day in wall-clock terms (`HH:MM`), so every
//! datetime that reaches the composer is reduced to minutes since midnight.
//! Dates are dropped: blocked ranges and tasks are assumed to fall on "today".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::FormatError;

/// Minutes in a day; also the value of the exclusive `24:00` bound
pub const MINUTES_PER_DAY: u16 = 24 * 60;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// A wall-clock time of day in minutes since midnight (`0..=1440`)
///
/// `24:00` is representable so that "until midnight" can be expressed as an
/// exclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clock(u16);

impl Clock {
    /// Exclusive end of the day, rendered as `24:00`
    pub const END_OF_DAY: Clock = Clock(MINUTES_PER_DAY);

    /// Default start of the working day (`09:00`)
    pub const DAY_START: Clock = Clock(9 * 60);

    /// Default end of the working day (`18:00`)
    pub const DAY_END: Clock = Clock(18 * 60);

    /// Build a clock value from hours and minutes
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        let total = hour.checked_mul(60)?.checked_add(minute)?;
        if total > MINUTES_PER_DAY {
            return None;
        }
        Some(Self(total))
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// The local wall clock, truncated to the minute
    pub fn now() -> Self {
        let now = chrono::Local::now().time();
        debug!(%now, "Clock::now: called");
        Self::from_time(now)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Parse a strict `HH:MM` string (`24:00` allowed)
    pub fn parse(value: &str) -> Result<Self, FormatError> {
        debug!(%value, "Clock::parse: called");
        let (hour, minute) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| FormatError::new(value, "expected HH:MM"))?;

        if hour.len() != 2 || minute.len() != 2 {
            return Err(FormatError::new(value, "expected HH:MM"));
        }

        let hour: u16 = hour.parse().map_err(|_| FormatError::new(value, "hour is not a number"))?;
        let minute: u16 = minute
            .parse()
            .map_err(|_| FormatError::new(value, "minute is not a number"))?;

        Self::from_hm(hour, minute).ok_or_else(|| FormatError::new(value, "time of day out of range"))
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Clock {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Clock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Clock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` span of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockRange {
    pub start: Clock,
    pub end: Clock,
}

impl ClockRange {
    pub fn new(start: Clock, end: Clock) -> Self {
        Self { start, end }
    }

    /// True when the range holds no time at all
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when `[start, start + length)` fits entirely inside the range
    pub fn contains_span(&self, start: i64, length: i64) -> bool {
        start >= i64::from(self.start.0) && start.saturating_add(length) <= i64::from(self.end.0)
    }

    /// True when `[start, start + length)` shares any minute with the range
    pub fn intersects_span(&self, start: i64, length: i64) -> bool {
        start < i64::from(self.end.0) && start.saturating_add(length) > i64::from(self.start.0)
    }
}

impl fmt::Display for ClockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Parse an ISO-8601 datetime, with or without offset or seconds
///
/// Values carrying an offset keep the wall-clock time written in them.
pub fn parse_iso8601(value: &str) -> Result<NaiveDateTime, FormatError> {
    debug!(%value, "parse_iso8601: called");
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        debug!("parse_iso8601: matched RFC 3339");
        return Ok(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| FormatError::new(value, "expected an ISO-8601 datetime"))
}

/// Parse either an ISO-8601 datetime or an ISO-8601 time of day into a clock value
fn parse_clock_point(value: &str) -> Result<Clock, FormatError> {
    if let Ok(dt) = parse_iso8601(value) {
        return Ok(Clock::from_time(dt.time()));
    }

    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .map(Clock::from_time)
        .ok_or_else(|| FormatError::new(value, "expected an ISO-8601 datetime or time of day"))
}

/// Reduce a pair of ISO-8601 values to a clock range, dropping the date
pub fn parse_time_range(start: &str, end: &str) -> Result<ClockRange, FormatError> {
    debug!(%start, %end, "parse_time_range: called");
    Ok(ClockRange::new(parse_clock_point(start)?, parse_clock_point(end)?))
}

/// Render a range as `HH:MM - HH:MM`
///
/// Accepts the halves of an already simplified range, so applying it twice
/// yields the same text.
pub fn simplify_time_range(start: &str, end: &str) -> Result<String, FormatError> {
    parse_time_range(start, end).map(|range| range.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_time_range() {
        let simplified = simplify_time_range("2025-06-11T14:00:00", "2025-06-11T14:30:00").unwrap();
        assert_eq!(simplified, "14:00 - 14:30");
    }

    #[test]
    fn test_simplify_time_range_is_idempotent() {
        let once = simplify_time_range("2025-06-11T14:00:00", "2025-06-11T14:30:00").unwrap();
        let (start, end) = once.split_once(" - ").unwrap();
        let twice = simplify_time_range(start, end).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_simplify_time_range_rejects_garbage() {
        let err = simplify_time_range("not-a-date", "2025-06-11T14:30:00").unwrap_err();
        assert_eq!(err.value, "not-a-date");

        assert!(simplify_time_range("2025-06-11T14:00:00", "").is_err());
        assert!(simplify_time_range("2025-13-45T99:00:00", "2025-06-11T14:30:00").is_err());
    }

    #[test]
    fn test_simplify_time_range_offsets_and_minutes() {
        assert_eq!(
            simplify_time_range("2025-06-11T08:05:00Z", "2025-06-11T08:50:00+02:00").unwrap(),
            "08:05 - 08:50"
        );
        assert_eq!(
            simplify_time_range("2025-06-11T16:00", "2025-06-11T17:15:30.500").unwrap(),
            "16:00 - 17:15"
        );
    }

    #[test]
    fn test_clock_parse_and_display() {
        assert_eq!(Clock::parse("09:15").unwrap().minutes(), 9 * 60 + 15);
        assert_eq!(Clock::parse("24:00").unwrap(), Clock::END_OF_DAY);
        assert_eq!(Clock::END_OF_DAY.to_string(), "24:00");
        assert_eq!(Clock::from_hm(7, 5).unwrap().to_string(), "07:05");

        assert!(Clock::parse("9:15").is_err());
        assert!(Clock::parse("24:01").is_err());
        assert!(Clock::parse("12:60").is_err());
        assert!(Clock::parse("noon").is_err());
    }

    #[test]
    fn test_clock_serde_round_trip_as_string() {
        let clock: Clock = serde_yaml::from_str("\"18:00\"").unwrap();
        assert_eq!(clock, Clock::from_hm(18, 0).unwrap());
        assert_eq!(serde_json::to_string(&clock).unwrap(), "\"18:00\"");
    }

    #[test]
    fn test_clock_range_spans() {
        let range = ClockRange::new(Clock::from_hm(10, 0).unwrap(), Clock::from_hm(10, 30).unwrap());
        assert!(range.intersects_span(9 * 60 + 45, 30));
        assert!(!range.intersects_span(9 * 60, 60));
        assert!(!range.intersects_span(10 * 60 + 30, 15));
        assert!(range.contains_span(10 * 60, 30));
        assert!(!range.contains_span(10 * 60, 31));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_clock_range_spans_with_huge_lengths() {
        let day = ClockRange::new(Clock::DAY_START, Clock::END_OF_DAY);
        let start = 9 * 60;
        assert!(!day.contains_span(start, 4_294_967_296));
        assert!(!day.contains_span(start, 4_294_967_000));
        assert!(!day.contains_span(start, i64::MAX));
        assert!(day.intersects_span(start, i64::MAX));

        let blocked = ClockRange::new(Clock::from_hm(10, 0).unwrap(), Clock::from_hm(10, 30).unwrap());
        assert!(blocked.intersects_span(start, 4_294_967_296));
    }

    #[test]
    fn test_parse_iso8601_accepts_common_shapes() {
        assert!(parse_iso8601("2025-06-11T08:00:00").is_ok());
        assert!(parse_iso8601("2025-06-11T08:00:00.000Z").is_ok());
        assert!(parse_iso8601("2025-06-11 08:00").is_ok());
        assert!(parse_iso8601("08:00").is_err());
    }
}
