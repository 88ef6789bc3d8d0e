//! Overtime aggregation.
//!
//! This module walks a workday's segments in order, keeping a running total
//! of worked hours against the day's cap, and books each segment's hours
//! into the seven [`CategoryTotals`] buckets.
//!
//! Hours up to the cap are surcharge-eligible; hours past it are overtime.
//! Ordinary daytime hours within the cap land in no bucket.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TimeBand;
use crate::models::{
    AuditStep, CategoryTotals, HolidaySet, SurchargeCategory, Timestamp, WeeklySchedule,
};

use super::range_factory::Segment;

/// The facts about a workday that hold for all of its segments.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::WorkdayContext;
/// use overtime_engine::config::RegulationConfig;
/// use overtime_engine::models::Timestamp;
/// use rust_decimal::Decimal;
///
/// let config = RegulationConfig::colombia();
/// let saturday = Timestamp::parse("2025-03-08T20:00").unwrap();
/// let day = WorkdayContext::new(&saturday, config.defaults(), config.holidays());
/// assert!(!day.is_holiday);
/// assert_eq!(day.cap, Decimal::from(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayContext {
    /// Weekday of the workday's first instant, 0 for Sunday.
    pub weekday: usize,
    /// Whether the workday's first instant is a holiday.
    pub is_holiday: bool,
    /// Worked hours allowed before overtime accrues.
    pub cap: Decimal,
}

impl WorkdayContext {
    /// Derives the context from the workday's first instant.
    pub fn new(anchor: &Timestamp, schedule: &WeeklySchedule, holidays: &HolidaySet) -> Self {
        let weekday = anchor.weekday_index();
        let is_holiday = anchor.is_holiday(holidays);
        Self {
            weekday,
            is_holiday,
            cap: schedule.daily_cap(weekday, is_holiday),
        }
    }
}

/// The result of aggregating one workday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    /// The workday's category totals.
    pub totals: CategoryTotals,
    /// Sum of all segment hours.
    pub worked_hours: Decimal,
    /// Segment hours past the cap.
    pub overtime_hours: Decimal,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Portion of a segment past the cap, given the running total including it.
fn beyond_cap(hours: Decimal, running: Decimal, cap: Decimal) -> Decimal {
    (running - cap).max(Decimal::ZERO).min(hours)
}

/// Books one segment's split into the buckets.
///
/// Each rule is applied on its own; a segment can feed more than one
/// surcharge bucket.
fn book(
    totals: CategoryTotals,
    segment: &Segment,
    within: Decimal,
    beyond: Decimal,
    day_is_holiday: bool,
) -> CategoryTotals {
    let night = segment.band == TimeBand::Nighttime;
    let holiday = segment.is_holiday;

    [
        (holiday && day_is_holiday, SurchargeCategory::HolidaySurcharge, within),
        (night && (!holiday || day_is_holiday), SurchargeCategory::NightSurcharge, within),
        (night && holiday && !day_is_holiday, SurchargeCategory::HolidayNightSurcharge, within),
        (!night && !holiday, SurchargeCategory::OrdinaryDayOvertime, beyond),
        (night && !holiday, SurchargeCategory::OrdinaryNightOvertime, beyond),
        (!night && holiday, SurchargeCategory::HolidayDayOvertime, beyond),
        (night && holiday, SurchargeCategory::HolidayNightOvertime, beyond),
    ]
    .into_iter()
    .filter(|(applies, _, _)| *applies)
    .fold(totals, |acc, (_, category, hours)| acc.with(category, hours))
}

/// Aggregates a workday's segments into category totals.
///
/// `segments` must be in chronological order.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{aggregate, build_segments, WorkdayContext};
/// use overtime_engine::config::RegulationConfig;
/// use overtime_engine::models::{ShiftRecord, Timestamp};
/// use rust_decimal::Decimal;
///
/// let config = RegulationConfig::colombia();
/// let record = ShiftRecord {
///     id: "rec_001".to_string(),
///     operator_id: "op_1".to_string(),
///     start: Timestamp::parse("2025-03-04T08:00").unwrap(),
///     end: Timestamp::parse("2025-03-04T18:00").unwrap(),
///     rest: None,
///     schedule: config.defaults().clone(),
/// };
/// let segments = build_segments(&record, &config).unwrap();
/// let day = WorkdayContext::new(&record.start, &record.schedule, config.holidays());
///
/// let result = aggregate(&segments, &day, 1);
/// assert_eq!(result.totals.ordinary_day_overtime, Decimal::from(2));
/// assert_eq!(result.overtime_hours, Decimal::from(2));
/// ```
pub fn aggregate(segments: &[Segment], day: &WorkdayContext, step_number: u32) -> Aggregation {
    let (worked_hours, overtime_hours, totals) = segments.iter().fold(
        (Decimal::ZERO, Decimal::ZERO, CategoryTotals::default()),
        |(running, overtime, totals), segment| {
            let running = running + segment.hours;
            let beyond = beyond_cap(segment.hours, running, day.cap);
            let within = segment.hours - beyond;
            (
                running,
                overtime + beyond,
                book(totals, segment, within, beyond, day.is_holiday),
            )
        },
    );

    debug!(
        cap = %day.cap,
        day_is_holiday = day.is_holiday,
        segments = segments.len(),
        worked_hours = %worked_hours,
        "Aggregated workday"
    );

    let reasoning = if overtime_hours > Decimal::ZERO {
        format!(
            "{} hours worked against a {} hour cap on a {} day, {} hours of overtime",
            worked_hours.normalize(),
            day.cap.normalize(),
            if day.is_holiday { "holiday" } else { "working" },
            overtime_hours.normalize()
        )
    } else {
        format!(
            "{} hours worked within the {} hour cap on a {} day, no overtime",
            worked_hours.normalize(),
            day.cap.normalize(),
            if day.is_holiday { "holiday" } else { "working" }
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_aggregation".to_string(),
        rule_name: "Overtime and Surcharge Aggregation".to_string(),
        clause_ref: "CST art. 168, 179".to_string(),
        input: serde_json::json!({
            "segments": segments.len(),
            "cap": day.cap.normalize().to_string(),
            "day_is_holiday": day.is_holiday,
            "weekday": day.weekday
        }),
        output: SurchargeCategory::ALL
            .iter()
            .map(|c| {
                let hours = serde_json::Value::from(totals.get(*c).normalize().to_string());
                (c.code().to_string(), hours)
            })
            .collect::<serde_json::Map<String, serde_json::Value>>()
            .into(),
        reasoning,
    };

    Aggregation {
        totals,
        worked_hours,
        overtime_hours,
        audit_step,
    }
}
