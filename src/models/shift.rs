//! Shift models and related types.
//!
//! A punch record travels through three shapes:
//! - [`ShiftRequest`]: the wire shape, with timestamps as text and every
//!   punch optional.
//! - [`ParsedShift`]: timestamps parsed, punches still optional.
//! - [`ShiftRecord`]: validated; start and end present and any break fully
//!   inside the shift.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

use super::Timestamp;

/// Mandatory ordinary hours per weekday plus the holiday cap.
///
/// `weekly_hours` is indexed by [`Timestamp::weekday_index`], so index 0 is
/// Sunday (a placeholder, since Sundays use the holiday cap) and indices 1-6
/// are Monday through Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    /// Mandatory hours for each weekday, Sunday first.
    pub weekly_hours: [Decimal; 7],
    /// Ordinary hours allowed on a holiday before overtime accrues.
    pub holiday_cap: Decimal,
}

impl WeeklySchedule {
    /// Mandatory hours for the weekday with the given index.
    pub fn mandatory_hours(&self, weekday_index: usize) -> Decimal {
        self.weekly_hours
            .get(weekday_index)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The workday cap: the holiday cap on holidays, the weekday's mandatory
    /// hours otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_engine::models::WeeklySchedule;
    /// use rust_decimal::Decimal;
    ///
    /// let schedule = WeeklySchedule {
    ///     weekly_hours: [0u32, 8, 8, 8, 8, 8, 4].map(Decimal::from),
    ///     holiday_cap: Decimal::from(7),
    /// };
    /// assert_eq!(schedule.daily_cap(6, false), Decimal::from(4));
    /// assert_eq!(schedule.daily_cap(6, true), Decimal::from(7));
    /// ```
    pub fn daily_cap(&self, weekday_index: usize, day_is_holiday: bool) -> Decimal {
        if day_is_holiday {
            self.holiday_cap
        } else {
            self.mandatory_hours(weekday_index)
        }
    }

    /// Sum of the weekly mandatory hours.
    pub fn weekly_total(&self) -> Decimal {
        self.weekly_hours.iter().copied().sum()
    }
}

/// A punch record as received from upstream.
///
/// Timestamps use `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]` and are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Opaque identifier of the source record.
    pub id: String,
    /// Identity of the operator who worked the shift.
    pub operator_id: String,
    /// Start punch.
    #[serde(default)]
    pub start: Option<String>,
    /// End punch; absent while the shift is still open.
    #[serde(default)]
    pub end: Option<String>,
    /// Start of the unpaid break.
    #[serde(default)]
    pub break_start: Option<String>,
    /// End of the unpaid break.
    #[serde(default)]
    pub break_end: Option<String>,
    /// Mandatory hours per weekday, Sunday first.
    #[serde(default)]
    pub weekly_hours: Option<[Decimal; 7]>,
    /// Ordinary hours allowed on a holiday.
    #[serde(default)]
    pub holiday_cap: Option<Decimal>,
}

impl ShiftRequest {
    /// Parses every present timestamp. Schedule fields the record leaves
    /// out are taken from `defaults`.
    pub fn parse(&self, defaults: &WeeklySchedule) -> EngineResult<ParsedShift> {
        let parse = |text: &Option<String>| -> EngineResult<Option<Timestamp>> {
            text.as_deref().map(Timestamp::parse).transpose()
        };

        Ok(ParsedShift {
            id: self.id.clone(),
            operator_id: self.operator_id.clone(),
            start: parse(&self.start)?,
            end: parse(&self.end)?,
            break_start: parse(&self.break_start)?,
            break_end: parse(&self.break_end)?,
            schedule: WeeklySchedule {
                weekly_hours: self.weekly_hours.unwrap_or(defaults.weekly_hours),
                holiday_cap: self.holiday_cap.unwrap_or(defaults.holiday_cap),
            },
        })
    }
}

/// A punch record with parsed, not yet validated, timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedShift {
    /// Opaque identifier of the source record.
    pub id: String,
    /// Identity of the operator who worked the shift.
    pub operator_id: String,
    /// Start punch.
    pub start: Option<Timestamp>,
    /// End punch.
    pub end: Option<Timestamp>,
    /// Start of the break.
    pub break_start: Option<Timestamp>,
    /// End of the break.
    pub break_end: Option<Timestamp>,
    /// Schedule configuration carried by the record.
    pub schedule: WeeklySchedule,
}

impl ParsedShift {
    /// Whether the record has a start punch but no end punch yet.
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }
}

/// An unpaid break carved out of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftBreak {
    /// The start time of the break.
    pub start: Timestamp,
    /// The end time of the break.
    pub end: Timestamp,
}

impl ShiftBreak {
    /// Returns the duration of the break in hours.
    pub fn duration_hours(&self) -> Decimal {
        self.start.hours_until(&self.end)
    }
}

/// A validated punch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Opaque identifier of the source record.
    pub id: String,
    /// Identity of the operator who worked the shift.
    pub operator_id: String,
    /// The start time of the shift.
    pub start: Timestamp,
    /// The end time of the shift.
    pub end: Timestamp,
    /// The break taken during the shift, if any.
    pub rest: Option<ShiftBreak>,
    /// Schedule configuration carried by the record.
    pub schedule: WeeklySchedule,
}

impl ShiftRecord {
    /// Calculates the total worked hours for the shift.
    ///
    /// The break, if any, is subtracted from the shift duration.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime_engine::models::{ShiftBreak, ShiftRecord, Timestamp, WeeklySchedule};
    /// use rust_decimal::Decimal;
    ///
    /// let shift = ShiftRecord {
    ///     id: "rec_001".to_string(),
    ///     operator_id: "op_1".to_string(),
    ///     start: Timestamp::parse("2025-03-04T08:00").unwrap(),
    ///     end: Timestamp::parse("2025-03-04T17:00").unwrap(),
    ///     rest: Some(ShiftBreak {
    ///         start: Timestamp::parse("2025-03-04T12:00").unwrap(),
    ///         end: Timestamp::parse("2025-03-04T12:30").unwrap(),
    ///     }),
    ///     schedule: WeeklySchedule {
    ///         weekly_hours: [0u32, 8, 8, 8, 8, 8, 4].map(Decimal::from),
    ///         holiday_cap: Decimal::from(8),
    ///     },
    /// };
    /// assert_eq!(shift.worked_hours(), Decimal::new(85, 1)); // 8.5 hours
    /// ```
    pub fn worked_hours(&self) -> Decimal {
        let rest = self
            .rest
            .map(|b| b.duration_hours())
            .unwrap_or(Decimal::ZERO);
        self.duration_hours() - rest
    }

    /// Hours between start and end punches, break included.
    pub fn duration_hours(&self) -> Decimal {
        self.start.hours_until(&self.end)
    }

    /// The calendar day the shift is booked to: the day of its start.
    pub fn workday(&self) -> NaiveDate {
        self.start.date()
    }

    /// The worked intervals: the whole shift, or the two stretches either
    /// side of the break.
    pub fn working_intervals(&self) -> Vec<(Timestamp, Timestamp)> {
        match self.rest {
            Some(rest) => vec![(self.start, rest.start), (rest.end, self.end)],
            None => vec![(self.start, self.end)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ts(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap()
    }

    fn schedule() -> WeeklySchedule {
        WeeklySchedule {
            weekly_hours: [0u32, 8, 8, 8, 8, 8, 4].map(Decimal::from),
            holiday_cap: Decimal::from(8),
        }
    }

    fn record(start: &str, end: &str, rest: Option<(&str, &str)>) -> ShiftRecord {
        ShiftRecord {
            id: "rec_001".to_string(),
            operator_id: "op_1".to_string(),
            start: ts(start),
            end: ts(end),
            rest: rest.map(|(s, e)| ShiftBreak {
                start: ts(s),
                end: ts(e),
            }),
            schedule: schedule(),
        }
    }

    /// SH-001: 8 hour shift no break
    #[test]
    fn test_sh_001_8_hour_shift_no_break() {
        let shift = record("2025-03-04T08:00", "2025-03-04T16:00", None);
        assert_eq!(shift.worked_hours(), dec("8"));
        assert_eq!(shift.working_intervals().len(), 1);
    }

    /// SH-002: break is subtracted
    #[test]
    fn test_sh_002_break_subtracted() {
        let shift = record(
            "2025-03-04T08:00",
            "2025-03-04T17:30",
            Some(("2025-03-04T12:00", "2025-03-04T13:00")),
        );
        assert_eq!(shift.duration_hours(), dec("9.5"));
        assert_eq!(shift.worked_hours(), dec("8.5"));
        assert_eq!(
            shift.working_intervals(),
            vec![
                (ts("2025-03-04T08:00"), ts("2025-03-04T12:00")),
                (ts("2025-03-04T13:00"), ts("2025-03-04T17:30")),
            ]
        );
    }

    /// SH-003: overnight shift is booked to its start day
    #[test]
    fn test_sh_003_overnight_shift_workday() {
        let shift = record("2025-03-04T22:00", "2025-03-05T06:00", None);
        assert_eq!(shift.worked_hours(), dec("8"));
        assert_eq!(shift.workday(), NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    }

    #[test]
    fn test_daily_cap_uses_holiday_cap_on_holidays() {
        let mut schedule = schedule();
        schedule.holiday_cap = dec("6.5");
        assert_eq!(schedule.daily_cap(2, false), dec("8"));
        assert_eq!(schedule.daily_cap(2, true), dec("6.5"));
        assert_eq!(schedule.daily_cap(0, false), Decimal::ZERO);
        assert_eq!(schedule.weekly_total(), dec("44"));
    }

    #[test]
    fn test_request_deserialization_and_parse() {
        let json = r#"{
            "id": "rec_001",
            "operator_id": "op_1",
            "start": "2025-03-04T08:00",
            "end": "2025-03-04T17:00:00",
            "break_start": "2025-03-04T12:00",
            "break_end": "2025-03-04T13:00",
            "weekly_hours": [0, 8, 8, 8, 8, 8, 4],
            "holiday_cap": 8
        }"#;

        let request: ShiftRequest = serde_json::from_str(json).unwrap();
        let parsed = request.parse(&schedule()).unwrap();
        assert_eq!(parsed.start, Some(ts("2025-03-04T08:00")));
        assert_eq!(parsed.end, Some(ts("2025-03-04T17:00")));
        assert!(!parsed.is_open());
        assert_eq!(parsed.schedule.mandatory_hours(6), dec("4"));
    }

    #[test]
    fn test_request_optional_punches_default_to_none() {
        let json = r#"{
            "id": "rec_002",
            "operator_id": "op_1",
            "start": "2025-03-04T08:00",
            "weekly_hours": [0, 8, 8, 8, 8, 8, 4],
            "holiday_cap": "8"
        }"#;

        let parsed = serde_json::from_str::<ShiftRequest>(json)
            .unwrap()
            .parse(&schedule())
            .unwrap();
        assert!(parsed.is_open());
    }

    #[test]
    fn test_request_without_schedule_uses_defaults() {
        let json = r#"{
            "id": "rec_005",
            "operator_id": "op_1",
            "start": "2025-03-04T08:00",
            "end": "2025-03-04T16:00",
            "holiday_cap": 6
        }"#;

        let mut defaults = schedule();
        defaults.weekly_hours[2] = dec("7.5");
        let parsed = serde_json::from_str::<ShiftRequest>(json)
            .unwrap()
            .parse(&defaults)
            .unwrap();
        assert_eq!(parsed.schedule.mandatory_hours(2), dec("7.5"));
        assert_eq!(parsed.schedule.holiday_cap, dec("6"));
    }

    #[test]
    fn test_request_rejects_short_weekly_hours() {
        let json = r#"{
            "id": "rec_003",
            "operator_id": "op_1",
            "weekly_hours": [8, 8, 8],
            "holiday_cap": 8
        }"#;
        assert!(serde_json::from_str::<ShiftRequest>(json).is_err());
    }

    #[test]
    fn test_request_parse_reports_bad_timestamp() {
        let request = ShiftRequest {
            id: "rec_004".to_string(),
            operator_id: "op_1".to_string(),
            start: Some("2025-03-04 08:00".to_string()),
            end: None,
            break_start: None,
            break_end: None,
            weekly_hours: None,
            holiday_cap: None,
        };
        match request.parse(&schedule()) {
            Err(EngineError::InvalidTimestamp { value }) => assert_eq!(value, "2025-03-04 08:00"),
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }
}
