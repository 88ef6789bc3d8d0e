//! Point-in-time value used throughout the engine.
//!
//! A [`Timestamp`] wraps a single UTC instant and exposes the calendar
//! accessors the segmenting and aggregation logic need: calendar fields,
//! the weekday index, fractional hours of the day, and day/holiday
//! comparisons.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::HolidaySet;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Rounds an hour quantity to two decimal places, midpoint away from zero.
pub(crate) fn round_hours(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// An immutable UTC instant.
///
/// # Example
///
/// ```
/// use overtime_engine::models::Timestamp;
///
/// let ts = Timestamp::parse("2025-03-04T07:20").unwrap();
/// assert_eq!(ts.weekday_index(), 2); // Tuesday
/// assert_eq!(ts.hours_of_day().to_string(), "7.33");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`, interpreted as UTC.
    ///
    /// A date without a time component is midnight of that day.
    pub fn parse(text: &str) -> EngineResult<Self> {
        let text = text.trim();
        let invalid = || EngineError::InvalidTimestamp {
            value: text.to_string(),
        };

        if !text.contains('T') {
            let date = NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())?;
            return Ok(Self::from_naive(date.and_time(NaiveTime::MIN)));
        }

        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(Self::from_naive)
            .ok_or_else(invalid)
    }

    /// Wraps a naive datetime that is already expressed in UTC.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self(datetime.and_utc())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The day of the month (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The hour of the day (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// The minute of the hour.
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// The second of the minute.
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Weekday index with 0 = Sunday through 6 = Saturday.
    pub fn weekday_index(&self) -> usize {
        self.0.weekday().num_days_from_sunday() as usize
    }

    /// The calendar day of this instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// The time of day of this instant.
    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    /// Fractional hours since midnight, rounded to two decimal places.
    ///
    /// `hour + minute / 60 + second / 3600`, so 07:20 yields `7.33`.
    pub fn hours_of_day(&self) -> Decimal {
        let raw = Decimal::from(self.hour())
            + Decimal::from(self.minute()) / Decimal::from(60)
            + Decimal::from(self.second()) / Decimal::from(3600);
        round_hours(raw)
    }

    /// Whether both instants fall on the same calendar day.
    pub fn same_day(&self, other: &Timestamp) -> bool {
        self.date() == other.date()
    }

    /// Whether this instant falls on a Sunday or on a listed holiday.
    pub fn is_holiday(&self, holidays: &HolidaySet) -> bool {
        self.weekday_index() == 0 || holidays.contains(self.date())
    }

    /// The instant `hour` hours after midnight of this instant's day.
    ///
    /// `at_hour(24)` is midnight of the following day.
    pub fn at_hour(&self, hour: u32) -> Timestamp {
        let midnight = self.date().and_time(NaiveTime::MIN);
        Self::from_naive(midnight + TimeDelta::hours(i64::from(hour)))
    }

    /// Seconds elapsed since midnight of this instant's day.
    pub fn seconds_of_day(&self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    /// Hours from this instant until `later`, negative if `later` is earlier.
    pub fn hours_until(&self, later: &Timestamp) -> Decimal {
        let seconds = (later.0 - self.0).num_seconds();
        Decimal::from(seconds) / Decimal::from(3600)
    }

    /// This instant shifted by a signed number of minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Timestamp {
        Timestamp(self.0 + TimeDelta::minutes(minutes))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Holiday;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ts(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap()
    }

    /// TS-001: date-only text is midnight UTC
    #[test]
    fn test_ts_001_date_only_is_midnight() {
        let value = ts("2025-03-04");
        assert_eq!(value.hour(), 0);
        assert_eq!(value.minute(), 0);
        assert_eq!(value.day(), 4);
        assert_eq!(value.month(), 3);
        assert_eq!(value.year(), 2025);
    }

    /// TS-002: minutes and optional seconds
    #[test]
    fn test_ts_002_minutes_and_seconds() {
        let value = ts("2025-03-04T07:20");
        assert_eq!((value.hour(), value.minute(), value.second()), (7, 20, 0));

        let value = ts("2025-03-04T07:20:45");
        assert_eq!(value.second(), 45);
    }

    /// TS-003: malformed text is rejected
    #[test]
    fn test_ts_003_invalid_text() {
        for text in ["", "04/03/2025", "2025-02-30", "2025-03-04T25:00", "yesterday"] {
            match Timestamp::parse(text) {
                Err(EngineError::InvalidTimestamp { .. }) => {}
                other => panic!("expected InvalidTimestamp for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_weekday_index_starts_on_sunday() {
        assert_eq!(ts("2025-03-09").weekday_index(), 0); // Sunday
        assert_eq!(ts("2025-03-10").weekday_index(), 1); // Monday
        assert_eq!(ts("2025-03-15").weekday_index(), 6); // Saturday
    }

    #[test]
    fn test_hours_of_day_rounds_to_two_places() {
        assert_eq!(ts("2025-03-04T07:20").hours_of_day(), dec("7.33"));
        assert_eq!(ts("2025-03-04T07:10").hours_of_day(), dec("7.17"));
        assert_eq!(ts("2025-03-04T22:45").hours_of_day(), dec("22.75"));
        assert_eq!(ts("2025-03-04T00:00").hours_of_day(), Decimal::ZERO);
        assert_eq!(ts("2025-03-04T12:00:30").hours_of_day(), dec("12.01"));
    }

    #[test]
    fn test_same_day() {
        assert!(ts("2025-03-04T01:00").same_day(&ts("2025-03-04T23:59")));
        assert!(!ts("2025-03-04T23:59").same_day(&ts("2025-03-05T00:00")));
        assert!(!ts("2025-03-04").same_day(&ts("2024-03-04")));
    }

    #[test]
    fn test_sunday_is_always_a_holiday() {
        let holidays = HolidaySet::default();
        assert!(ts("2025-03-09T10:00").is_holiday(&holidays));
        assert!(!ts("2025-03-10T10:00").is_holiday(&holidays));
    }

    #[test]
    fn test_listed_date_is_a_holiday() {
        let holidays = HolidaySet::new(vec![Holiday {
            date: NaiveDate::from_ymd_opt(2025, 3, 24).unwrap(),
            name: "San José".to_string(),
        }]);
        assert!(ts("2025-03-24T23:00").is_holiday(&holidays));
        assert!(!ts("2025-03-25T00:00").is_holiday(&holidays));
    }

    #[test]
    fn test_at_hour_24_is_next_midnight() {
        let value = ts("2025-03-04T22:00");
        assert_eq!(value.at_hour(24), ts("2025-03-05T00:00"));
        assert_eq!(value.at_hour(6), ts("2025-03-04T06:00"));
    }

    #[test]
    fn test_hours_until() {
        assert_eq!(
            ts("2025-03-04T22:00").hours_until(&ts("2025-03-05T02:30")),
            dec("4.5")
        );
    }

    #[test]
    fn test_timestamp_serialization() {
        let value = ts("2025-03-04T07:20");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"2025-03-04T07:20:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
