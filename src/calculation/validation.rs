//! Shift validation.
//!
//! Per-record rules run in a fixed order and stop at the first violation,
//! reporting that rule's message. The batch rule, [`find_overlap`], is
//! separate: its caller decides what an overlap costs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RegulationConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ParsedShift, ShiftBreak, ShiftRecord, Timestamp};

/// Message of the batch overlap rule.
pub const OVERLAP_MESSAGE: &str = "Los rangos no pueden superponerse";

/// Longest shift accepted under strict validation, in hours.
pub const MAX_SHIFT_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// A named per-record check.
#[derive(Debug, Clone, Copy)]
pub struct ShiftRule {
    /// Stable identifier, reported in [`EngineError::ShiftValidation`].
    pub id: &'static str,
    /// The message reported when the check fails.
    pub message: &'static str,
    check: fn(&ParsedShift) -> bool,
}

impl ShiftRule {
    /// Whether the shift passes this rule.
    pub fn check(&self, shift: &ParsedShift) -> bool {
        (self.check)(shift)
    }
}

fn both_ordered(first: Option<Timestamp>, second: Option<Timestamp>) -> bool {
    match (first, second) {
        (Some(first), Some(second)) => first < second,
        _ => true,
    }
}

/// The per-record rules, in evaluation order.
///
/// Ordering checks pass vacuously when a bound is missing; the presence
/// rules ahead of them have already rejected that case.
pub const SHIFT_RULES: [ShiftRule; 6] = [
    ShiftRule {
        id: "start_and_end_required",
        message: "Se deben incluir ambos horarios de inicio y fin",
        check: |s| s.start.is_some() && s.end.is_some(),
    },
    ShiftRule {
        id: "break_bounds_required",
        message: "Si hubo descanso se deben incluir ambos horarios",
        check: |s| s.break_start.is_some() == s.break_end.is_some(),
    },
    ShiftRule {
        id: "break_start_before_break_end",
        message: "La hora de inicio del descanso debe ser anterior al fin del descanso",
        check: |s| both_ordered(s.break_start, s.break_end),
    },
    ShiftRule {
        id: "break_after_shift_start",
        message: "La hora de inicio del descanso debe ser posterior al inicio del turno",
        check: |s| both_ordered(s.start, s.break_start),
    },
    ShiftRule {
        id: "break_before_shift_end",
        message: "La hora de fin del descanso debe ser anterior al fin del turno",
        check: |s| both_ordered(s.break_end, s.end),
    },
    ShiftRule {
        id: "start_before_end",
        message: "La hora de inicio debe ser anterior a la hora de fin",
        check: |s| both_ordered(s.start, s.end),
    },
];

fn violation(shift: &ParsedShift, rule: &'static str, message: impl Into<String>) -> EngineError {
    EngineError::ShiftValidation {
        shift_id: shift.id.clone(),
        rule,
        message: message.into(),
    }
}

/// Validates a parsed shift, producing a [`ShiftRecord`].
///
/// With strict validation on, two more rules follow the standard ones:
/// the weekly schedule must hold seven values in `0..=24` summing to at
/// most the statutory weekly cap in force on the start date, and the shift
/// may not last longer than [`MAX_SHIFT_HOURS`].
///
/// # Errors
///
/// [`EngineError::ShiftValidation`] carrying the first violated rule.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::validate_shift;
/// use overtime_engine::config::RegulationConfig;
/// use overtime_engine::models::ShiftRequest;
///
/// let config = RegulationConfig::colombia();
/// let request = ShiftRequest {
///     id: "rec_001".to_string(),
///     operator_id: "op_1".to_string(),
///     start: Some("2025-03-04T16:00".to_string()),
///     end: Some("2025-03-04T08:00".to_string()),
///     break_start: None,
///     break_end: None,
///     weekly_hours: None,
///     holiday_cap: None,
/// };
/// let parsed = request.parse(config.defaults()).unwrap();
/// let error = validate_shift(&parsed, &config).unwrap_err();
/// assert_eq!(error.to_string(), "La hora de inicio debe ser anterior a la hora de fin");
/// ```
pub fn validate_shift(shift: &ParsedShift, config: &RegulationConfig) -> EngineResult<ShiftRecord> {
    if let Some(rule) = SHIFT_RULES.iter().find(|rule| !rule.check(shift)) {
        return Err(violation(shift, rule.id, rule.message));
    }

    let (Some(start), Some(end)) = (shift.start, shift.end) else {
        let rule = &SHIFT_RULES[0];
        return Err(violation(shift, rule.id, rule.message));
    };
    let rest = match (shift.break_start, shift.break_end) {
        (Some(start), Some(end)) => Some(ShiftBreak { start, end }),
        _ => None,
    };

    let record = ShiftRecord {
        id: shift.id.clone(),
        operator_id: shift.operator_id.clone(),
        start,
        end,
        rest,
        schedule: shift.schedule.clone(),
    };

    if config.strict_validation() {
        check_weekly_hours(shift, &record, config)?;
        check_max_duration(shift, &record)?;
    }

    Ok(record)
}

fn check_weekly_hours(
    shift: &ParsedShift,
    record: &ShiftRecord,
    config: &RegulationConfig,
) -> EngineResult<()> {
    let weekly_max = config
        .ordinary_hours_cap(record.workday())
        .map(|cap| cap.weekly_max_hours);
    let hours = &record.schedule.weekly_hours;
    let in_range = hours
        .iter()
        .all(|h| *h >= Decimal::ZERO && *h <= MAX_SHIFT_HOURS);
    let total = record.schedule.weekly_total();
    let within_cap = weekly_max.is_none_or(|max| total <= max);

    if in_range && within_cap {
        return Ok(());
    }
    let bound = weekly_max
        .map(|max| format!(" y menor o igual a {}", max.normalize()))
        .unwrap_or_default();
    Err(violation(
        shift,
        "weekly_hours_within_bounds",
        format!(
            "Las horas obligatorias de la semana deben ser un arreglo de 7 elementos, cada uno debe ser un número entre 0 y 24 y la suma de todas las horas debe ser mayor o igual a 0{bound}"
        ),
    ))
}

fn check_max_duration(shift: &ParsedShift, record: &ShiftRecord) -> EngineResult<()> {
    if record.duration_hours() <= MAX_SHIFT_HOURS {
        Ok(())
    } else {
        Err(violation(
            shift,
            "max_24_hours",
            "Las duración del turno no puede ser mayor a 24 horas",
        ))
    }
}

/// Records a passed per-record validation as an audit step.
pub fn validation_step(record: &ShiftRecord, strict: bool, step_number: u32) -> AuditStep {
    let rules: Vec<&str> = SHIFT_RULES
        .iter()
        .map(|r| r.id)
        .chain(
            strict
                .then_some(["weekly_hours_within_bounds", "max_24_hours"])
                .into_iter()
                .flatten(),
        )
        .collect();

    AuditStep {
        step_number,
        rule_id: "shift_validation".to_string(),
        rule_name: "Shift Validation".to_string(),
        clause_ref: "CST art. 158, 161".to_string(),
        input: serde_json::json!({
            "record_id": record.id,
            "start": record.start.to_string(),
            "end": record.end.to_string(),
            "strict": strict
        }),
        output: serde_json::json!({
            "rules_passed": rules,
            "worked_hours": record.worked_hours().normalize().to_string()
        }),
        reasoning: format!(
            "Record {} passed {} validation rule(s), {} hours worked",
            record.id,
            rules.len(),
            record.worked_hours().normalize()
        ),
    }
}

/// Finds the first pair of `[start, end)` intervals that overlap.
///
/// Intervals are compared in start order, each against its predecessor. An
/// interval starting exactly when the previous one ends does not overlap
/// it. Returns the indices of the earlier and the later interval.
pub fn find_overlap(intervals: &[(Timestamp, Timestamp)]) -> Option<(usize, usize)> {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| intervals[i].0);
    order
        .windows(2)
        .find(|pair| intervals[pair[1]].0 < intervals[pair[0]].1)
        .map(|pair| (pair[0], pair[1]))
}

/// Outcome of the batch overlap check for one workday group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapCheck {
    /// IDs of the first overlapping pair, if any.
    pub overlapping: Option<(String, String)>,
    /// The audit step recording the check.
    pub audit_step: AuditStep,
}

/// Runs the batch overlap check over `(id, start, end)` triples and records
/// it as an audit step.
pub fn check_overlap(records: &[(&str, Timestamp, Timestamp)], step_number: u32) -> OverlapCheck {
    let intervals: Vec<(Timestamp, Timestamp)> =
        records.iter().map(|&(_, start, end)| (start, end)).collect();
    let overlapping = find_overlap(&intervals)
        .map(|(a, b)| (records[a].0.to_string(), records[b].0.to_string()));
    let ids: Vec<&str> = records.iter().map(|&(id, _, _)| id).collect();

    let reasoning = match &overlapping {
        Some((a, b)) => format!("{OVERLAP_MESSAGE}: {b} starts before {a} ends"),
        None => format!("{} record(s) do not overlap", records.len()),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "no_overlapping_shifts".to_string(),
        rule_name: "No Overlapping Shifts".to_string(),
        clause_ref: "CST art. 160".to_string(),
        input: serde_json::json!({ "records": ids }),
        output: serde_json::json!({ "overlap": overlapping.is_some() }),
        reasoning,
    };

    OverlapCheck {
        overlapping,
        audit_step,
    }
}
