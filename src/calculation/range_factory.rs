//! Time band segmentation.
//!
//! This module splits a validated shift into [`Segment`]s, each lying inside
//! one time band window on one calendar day. A break splits the shift into
//! two stretches that are segmented independently.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{RegulationConfig, TimeBand};
use crate::error::EngineResult;
use crate::models::{AuditStep, ShiftRecord, Timestamp};

/// A stretch of work inside a single time band window.
///
/// Produced by [`build_segments`] and consumed by the aggregator. The
/// holiday flag, weekday and date all describe the segment's start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// The start of the segment.
    pub start: Timestamp,
    /// The end of the segment.
    pub end: Timestamp,
    /// Day or night.
    pub band: TimeBand,
    /// Length in hours, as the difference of two-decimal hours of day.
    pub hours: Decimal,
    /// Whether the segment starts on a Sunday or listed holiday.
    pub is_holiday: bool,
    /// Weekday of the start, 0 for Sunday.
    pub weekday: usize,
    /// Calendar day of the start.
    pub date: NaiveDate,
}

/// Splits a shift into time band segments, in chronological order.
///
/// The band rule is looked up for each segment's own start, so a shift
/// running across the date a new rule takes effect is classified under
/// both. Segments shorter than the two-decimal resolution are dropped, as
/// is a trailing remainder under one minute.
///
/// # Errors
///
/// [`EngineError::NoTimeBand`](crate::error::EngineError::NoTimeBand) if the
/// configured windows leave a time of day uncovered.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::build_segments;
/// use overtime_engine::config::{RegulationConfig, TimeBand};
/// use overtime_engine::models::{ShiftRecord, Timestamp};
/// use rust_decimal::Decimal;
///
/// let config = RegulationConfig::colombia();
/// let record = ShiftRecord {
///     id: "rec_001".to_string(),
///     operator_id: "op_1".to_string(),
///     start: Timestamp::parse("2025-03-04T22:00").unwrap(),
///     end: Timestamp::parse("2025-03-05T02:00").unwrap(),
///     rest: None,
///     schedule: config.defaults().clone(),
/// };
///
/// let segments = build_segments(&record, &config).unwrap();
/// assert_eq!(segments.len(), 2);
/// assert!(segments.iter().all(|s| s.band == TimeBand::Nighttime));
/// assert_eq!(segments[0].hours, Decimal::from(2));
/// assert_eq!(segments[1].hours, Decimal::from(2));
/// ```
pub fn build_segments(record: &ShiftRecord, config: &RegulationConfig) -> EngineResult<Vec<Segment>> {
    let mut segments = Vec::new();
    for (from, to) in record.working_intervals() {
        segment_interval(from, to, config, &mut segments)?;
    }
    Ok(segments)
}

fn segment_interval(
    from: Timestamp,
    to: Timestamp,
    config: &RegulationConfig,
    segments: &mut Vec<Segment>,
) -> EngineResult<()> {
    let stop = to.plus_minutes(-1);
    let mut cursor = from;

    while cursor < stop {
        let rule = config.time_bands().rule_at(&cursor)?;
        let window_end = Decimal::from(rule.end_hour);

        // The window's end, unless the interval ends first on this same day.
        let (end, end_hours) = if cursor.same_day(&to) && to.hours_of_day() <= window_end {
            (to, to.hours_of_day())
        } else {
            (cursor.at_hour(rule.end_hour), window_end)
        };

        let hours = end_hours - cursor.hours_of_day();
        if hours > Decimal::ZERO {
            segments.push(Segment {
                start: cursor,
                end,
                band: rule.band,
                hours,
                is_holiday: cursor.is_holiday(config.holidays()),
                weekday: cursor.weekday_index(),
                date: cursor.date(),
            });
        }

        cursor = end;
    }

    Ok(())
}

/// Total hours across segments.
pub fn segment_hours(segments: &[Segment]) -> Decimal {
    segments.iter().map(|s| s.hours).sum()
}

/// A shift's segments together with the audit step describing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// The segments, in chronological order.
    pub segments: Vec<Segment>,
    /// The audit step recording the segmentation.
    pub audit_step: AuditStep,
}

/// Runs [`build_segments`] and records the result as an audit step.
pub fn segment_shift(
    record: &ShiftRecord,
    config: &RegulationConfig,
    step_number: u32,
) -> EngineResult<Segmentation> {
    let segments = build_segments(record, config)?;

    let night_hours: Decimal = segments
        .iter()
        .filter(|s| s.band == TimeBand::Nighttime)
        .map(|s| s.hours)
        .sum();
    let holiday_hours: Decimal = segments.iter().filter(|s| s.is_holiday).map(|s| s.hours).sum();
    let total = segment_hours(&segments);

    let audit_step = AuditStep {
        step_number,
        rule_id: "time_band_segmentation".to_string(),
        rule_name: "Time Band Segmentation".to_string(),
        clause_ref: "CST art. 160".to_string(),
        input: serde_json::json!({
            "record_id": record.id,
            "start": record.start.to_string(),
            "end": record.end.to_string(),
            "break": record.rest.map(|b| format!("{}/{}", b.start, b.end))
        }),
        output: serde_json::json!({
            "segments": segments
                .iter()
                .map(|s| serde_json::json!({
                    "start": s.start.to_string(),
                    "end": s.end.to_string(),
                    "band": s.band,
                    "hours": s.hours.normalize().to_string(),
                    "is_holiday": s.is_holiday
                }))
                .collect::<Vec<_>>()
        }),
        reasoning: format!(
            "{} hours in {} segment(s): {} at night, {} on holidays",
            total.normalize(),
            segments.len(),
            night_hours.normalize(),
            holiday_hours.normalize()
        ),
    };

    Ok(Segmentation {
        segments,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryRule, BoundaryTable, RegulationConfig};
    use crate::error::EngineError;
    use crate::models::{HolidaySet, ShiftBreak};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ts(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap()
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
            schedule: RegulationConfig::colombia().defaults().clone(),
        }
    }

    fn summary(segments: &[Segment]) -> Vec<(TimeBand, Decimal, bool)> {
        segments.iter().map(|s| (s.band, s.hours, s.is_holiday)).collect()
    }

    /// RF-001: daytime shift is a single segment
    #[test]
    fn test_rf_001_daytime_shift_single_segment() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2025-03-04T08:00", "2025-03-04T16:00", None), &config)
            .unwrap();
        assert_eq!(summary(&segments), vec![(TimeBand::Daytime, dec("8"), false)]);
        assert_eq!(segments[0].weekday, 2);
        assert_eq!(segments[0].end, ts("2025-03-04T16:00"));
    }

    /// RF-002: crossing midnight splits at 24:00
    #[test]
    fn test_rf_002_midnight_crossing() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2025-03-04T22:00", "2025-03-05T02:00", None), &config)
            .unwrap();
        assert_eq!(
            summary(&segments),
            vec![
                (TimeBand::Nighttime, dec("2"), false),
                (TimeBand::Nighttime, dec("2"), false),
            ]
        );
        assert_eq!(segments[0].end, ts("2025-03-05T00:00"));
        assert_eq!(segments[1].start, ts("2025-03-05T00:00"));
        assert_eq!(segments[1].date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    }

    /// RF-003: day into night before the reform
    #[test]
    fn test_rf_003_evening_before_reform() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2025-03-04T14:00", "2025-03-04T23:00", None), &config)
            .unwrap();
        assert_eq!(
            summary(&segments),
            vec![
                (TimeBand::Daytime, dec("7"), false),
                (TimeBand::Nighttime, dec("2"), false),
            ]
        );
    }

    /// RF-004: night starts at 19:00 after the reform
    #[test]
    fn test_rf_004_evening_after_reform() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2026-01-13T08:00", "2026-01-13T20:00", None), &config)
            .unwrap();
        assert_eq!(
            summary(&segments),
            vec![
                (TimeBand::Daytime, dec("11"), false),
                (TimeBand::Nighttime, dec("1"), false),
            ]
        );
    }

    /// RF-005: a shift straddling the reform date sees both rule sets
    #[test]
    fn test_rf_005_straddles_reform_date() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2025-12-24T18:00", "2025-12-25T20:00", None), &config)
            .unwrap();
        assert_eq!(
            summary(&segments),
            vec![
                // 24th, old rules: daytime until 21:00
                (TimeBand::Daytime, dec("3"), false),
                (TimeBand::Nighttime, dec("3"), false),
                // 25th is a holiday, new rules: daytime until 19:00
                (TimeBand::Nighttime, dec("6"), true),
                (TimeBand::Daytime, dec("13"), true),
                (TimeBand::Nighttime, dec("1"), true),
            ]
        );
    }

    /// RF-006: a break splits the shift
    #[test]
    fn test_rf_006_break_carved_out() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(
            &record(
                "2025-03-04T15:00",
                "2025-03-04T23:30",
                Some(("2025-03-04T18:00", "2025-03-04T18:30")),
            ),
            &config,
        )
        .unwrap();
        assert_eq!(
            summary(&segments),
            vec![
                (TimeBand::Daytime, dec("3"), false),
                (TimeBand::Daytime, dec("2.5"), false),
                (TimeBand::Nighttime, dec("2.5"), false),
            ]
        );
        assert_eq!(segment_hours(&segments), dec("8"));
    }

    /// RF-007: the holiday flag is taken at each segment's start
    #[test]
    fn test_rf_007_holiday_flag_from_segment_start() {
        let config = RegulationConfig::colombia();
        // Saturday 2025-03-08 into Sunday
        let segments = build_segments(&record("2025-03-08T20:00", "2025-03-09T04:00", None), &config)
            .unwrap();
        assert_eq!(
            summary(&segments),
            vec![
                (TimeBand::Daytime, dec("1"), false),
                (TimeBand::Nighttime, dec("3"), false),
                (TimeBand::Nighttime, dec("4"), true),
            ]
        );
        assert_eq!(segments[2].weekday, 0);
    }

    #[test]
    fn test_fractional_minutes_use_two_decimal_hours() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2025-03-04T08:20", "2025-03-04T16:00", None), &config)
            .unwrap();
        // 16.00 - 8.33
        assert_eq!(segments[0].hours, dec("7.67"));
    }

    #[test]
    fn test_trailing_remainder_under_a_minute_is_dropped() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(
            &record("2025-03-04T08:00", "2025-03-04T21:00:30", None),
            &config,
        )
        .unwrap();
        assert_eq!(summary(&segments), vec![(TimeBand::Daytime, dec("13"), false)]);
    }

    #[test]
    fn test_multi_day_shift() {
        let config = RegulationConfig::colombia();
        let segments = build_segments(&record("2025-03-04T08:00", "2025-03-06T08:00", None), &config)
            .unwrap();
        assert_eq!(segment_hours(&segments), dec("48"));
        assert!(segments.windows(2).all(|w| w[0].end == w[1].start));
    }

    #[test]
    fn test_segmentation_audit_step() {
        let config = RegulationConfig::colombia();
        let result = segment_shift(&record("2025-03-04T14:00", "2025-03-04T23:00", None), &config, 2)
            .unwrap();
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_id, "time_band_segmentation");
        assert_eq!(result.audit_step.output["segments"][1]["band"], "nighttime");
        assert_eq!(
            result.audit_step.reasoning,
            "9 hours in 2 segment(s): 2 at night, 0 on holidays"
        );
    }

    #[test]
    fn test_uncovered_time_of_day_is_an_error() {
        let bands = BoundaryTable::new(vec![BoundaryRule {
            band: TimeBand::Daytime,
            start_hour: 6,
            end_hour: 21,
            effective_from: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        }])
        .unwrap();
        let base = RegulationConfig::colombia();
        let config = RegulationConfig::new(
            base.metadata().clone(),
            base.defaults().clone(),
            bands,
            Vec::new(),
            HolidaySet::default(),
        );

        let result = build_segments(&record("2025-03-04T18:00", "2025-03-04T23:00", None), &config);
        assert!(matches!(result, Err(EngineError::NoTimeBand { .. })));
    }
}
