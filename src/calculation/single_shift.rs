//! Single-shift calculation.
//!
//! A lone punch record is its own workday: its totals are not prorated and
//! any validation failure is returned as an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RegulationConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, CategoryTotals, ShiftRecord, ShiftRequest};

use super::aggregator::{WorkdayContext, aggregate};
use super::range_factory::{Segment, segment_shift};
use super::validation::{validate_shift, validation_step};

/// The full result of calculating one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalculation {
    /// The source record identifier.
    pub shift_id: String,
    /// Hours worked, break excluded.
    pub worked_hours: Decimal,
    /// The time band segments the shift was split into.
    pub segments: Vec<Segment>,
    /// The shift's category totals.
    pub totals: CategoryTotals,
    /// The steps taken, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// Parses, validates and calculates a single punch record.
///
/// Schedule fields the request leaves out come from the configuration's
/// defaults.
///
/// # Errors
///
/// - [`EngineError::InvalidTimestamp`](crate::error::EngineError::InvalidTimestamp)
///   if a timestamp cannot be parsed
/// - [`EngineError::ShiftValidation`](crate::error::EngineError::ShiftValidation)
///   carrying the first violated rule's message
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::calculate_shift;
/// use overtime_engine::config::RegulationConfig;
/// use overtime_engine::models::ShiftRequest;
/// use rust_decimal::Decimal;
///
/// let request = ShiftRequest {
///     id: "rec_001".to_string(),
///     operator_id: "op_1".to_string(),
///     start: Some("2025-03-09T18:00".to_string()),
///     end: Some("2025-03-09T23:00".to_string()),
///     break_start: None,
///     break_end: None,
///     weekly_hours: None,
///     holiday_cap: None,
/// };
///
/// // A Sunday evening
/// let result = calculate_shift(&request, &RegulationConfig::colombia()).unwrap();
/// assert_eq!(result.totals.holiday_surcharge, Decimal::from(5));
/// assert_eq!(result.totals.night_surcharge, Decimal::from(2));
/// ```
pub fn calculate_shift(
    request: &ShiftRequest,
    config: &RegulationConfig,
) -> EngineResult<ShiftCalculation> {
    let parsed = request.parse(config.defaults())?;
    let record = validate_shift(&parsed, config)?;
    let step = validation_step(&record, config.strict_validation(), 1);

    let mut calculation = calculate_record(&record, config, 2)?;
    calculation.audit_steps.insert(0, step);
    Ok(calculation)
}

/// Calculates an already validated record, numbering audit steps from
/// `first_step`.
pub fn calculate_record(
    record: &ShiftRecord,
    config: &RegulationConfig,
    first_step: u32,
) -> EngineResult<ShiftCalculation> {
    let segmentation = segment_shift(record, config, first_step)?;
    let day = WorkdayContext::new(&record.start, &record.schedule, config.holidays());
    let aggregation = aggregate(&segmentation.segments, &day, first_step + 1);

    Ok(ShiftCalculation {
        shift_id: record.id.clone(),
        worked_hours: record.worked_hours(),
        segments: segmentation.segments,
        totals: aggregation.totals,
        audit_steps: vec![segmentation.audit_step, aggregation.audit_step],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn request(start: &str, end: &str) -> ShiftRequest {
        ShiftRequest {
            id: "rec_001".to_string(),
            operator_id: "op_1".to_string(),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            break_start: None,
            break_end: None,
            weekly_hours: None,
            holiday_cap: None,
        }
    }

    /// SS-001: break hours are excluded from every bucket
    #[test]
    fn test_ss_001_break_is_not_worked() {
        let mut req = request("2025-03-04T14:00", "2025-03-04T23:30");
        req.break_start = Some("2025-03-04T18:00".to_string());
        req.break_end = Some("2025-03-04T19:30".to_string());

        let result = calculate_shift(&req, &RegulationConfig::colombia()).unwrap();
        assert_eq!(result.worked_hours, dec("8"));
        // 14-18 and 19:30-21 day (5.5), 21-23:30 night (2.5); cap 8 reached exactly
        assert_eq!(result.totals.night_surcharge, dec("2.5"));
        assert_eq!(result.totals.overtime_hours(), Decimal::ZERO);
    }

    /// SS-002: the record's own holiday cap is used
    #[test]
    fn test_ss_002_record_holiday_cap() {
        let mut req = request("2025-12-08T08:00", "2025-12-08T16:00");
        req.holiday_cap = Some(dec("6"));

        let result = calculate_shift(&req, &RegulationConfig::colombia()).unwrap();
        assert_eq!(result.totals.holiday_surcharge, dec("6"));
        assert_eq!(result.totals.holiday_day_overtime, dec("2"));
    }

    /// SS-003: validation failures surface their message verbatim
    #[test]
    fn test_ss_003_validation_message_verbatim() {
        let mut req = request("2025-03-04T08:00", "2025-03-04T16:00");
        req.break_end = Some("2025-03-04T12:00".to_string());

        let error = calculate_shift(&req, &RegulationConfig::colombia()).unwrap_err();
        assert!(matches!(error, EngineError::ShiftValidation { .. }));
        assert_eq!(error.to_string(), "Si hubo descanso se deben incluir ambos horarios");
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let req = request("04/03/2025 08:00", "2025-03-04T16:00");
        let error = calculate_shift(&req, &RegulationConfig::colombia()).unwrap_err();
        assert!(matches!(error, EngineError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_audit_steps_in_order() {
        let result = calculate_shift(
            &request("2025-03-04T08:00", "2025-03-04T20:00"),
            &RegulationConfig::colombia(),
        )
        .unwrap();
        let steps: Vec<(u32, &str)> = result
            .audit_steps
            .iter()
            .map(|s| (s.step_number, s.rule_id.as_str()))
            .collect();
        assert_eq!(
            steps,
            vec![
                (1, "shift_validation"),
                (2, "time_band_segmentation"),
                (3, "overtime_aggregation"),
            ]
        );
    }

    #[test]
    fn test_holiday_anchor_held_for_whole_shift() {
        // Starts on a holiday Monday and runs into an ordinary Tuesday
        let result = calculate_shift(
            &request("2025-12-08T20:00", "2025-12-09T04:00"),
            &RegulationConfig::colombia(),
        )
        .unwrap();
        // 20-21 holiday day, 21-24 holiday night, 00-04 ordinary night;
        // the day is a holiday so the 8 hour holiday cap applies throughout
        assert_eq!(result.totals.holiday_surcharge, dec("4"));
        assert_eq!(result.totals.night_surcharge, dec("7"));
        assert_eq!(result.totals.holiday_night_surcharge, Decimal::ZERO);
        assert_eq!(result.totals.overtime_hours(), Decimal::ZERO);
    }
}
