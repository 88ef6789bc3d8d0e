//! Multi-record coordination.
//!
//! A workday may be punched as several records. The coordinator groups
//! records by operator and start day, aggregates each group once under the
//! schedule of its longest record, and prorates the group's totals back to
//! the records by worked hours.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RegulationConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, BatchResult, CategoryTotals, ParsedShift, RecordTotals,
    ShiftRecord, ShiftRequest, round_hours,
};

use super::aggregator::{WorkdayContext, aggregate};
use super::range_factory::segment_shift;
use super::validation::{OVERLAP_MESSAGE, check_overlap, validate_shift, validation_step};

/// The crate version, reported on every batch result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Records of one operator starting on one calendar day, in start order,
/// each with its position in the input.
type WorkdayGroup = Vec<(usize, ParsedShift)>;

fn next_step(trace: &AuditTrace) -> u32 {
    u32::try_from(trace.steps.len()).map_or(u32::MAX, |n| n.saturating_add(1))
}

fn excluded(record_id: &str, operator_id: &str, workday: NaiveDate) -> RecordTotals {
    RecordTotals {
        record_id: record_id.to_string(),
        operator_id: operator_id.to_string(),
        workday,
        worked_hours: Decimal::ZERO,
        totals: CategoryTotals::default(),
    }
}

fn open_record_warning(shift: &ParsedShift, workday: NaiveDate) -> AuditWarning {
    AuditWarning {
        code: "OPEN_SHIFT".to_string(),
        message: format!(
            "Record {} of operator {} on {} has no end punch and was not calculated",
            shift.id, shift.operator_id, workday
        ),
        severity: "medium".to_string(),
    }
}

/// Calculates category totals for a batch of punch records.
///
/// Every record is parsed first. Records with a start punch but no end
/// punch are in progress: they get zero totals and a warning. The rest are
/// grouped by operator and start day. A group containing overlapping
/// records gets zero totals for all of its records and a warning, without
/// failing the batch and without validating its records. Records of the
/// remaining groups are validated, and the first invalid one fails the
/// batch.
///
/// Within a group, the record with the most worked hours supplies the
/// weekly schedule and holiday cap (the later one on a tie). The group's
/// totals are shared out in proportion to worked hours, each field rounded
/// to two decimal places on its own.
///
/// # Errors
///
/// - [`EngineError::InvalidTimestamp`] if a timestamp cannot be parsed
/// - [`EngineError::ShiftValidation`] for the first record failing validation
/// - [`EngineError::NoTimeBand`] if the time bands leave a gap
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::calculate_batch;
/// use overtime_engine::config::RegulationConfig;
/// use overtime_engine::models::ShiftRequest;
/// use rust_decimal::Decimal;
///
/// let request = |id: &str, start: &str, end: &str| ShiftRequest {
///     id: id.to_string(),
///     operator_id: "op_1".to_string(),
///     start: Some(start.to_string()),
///     end: Some(end.to_string()),
///     break_start: None,
///     break_end: None,
///     weekly_hours: None,
///     holiday_cap: None,
/// };
///
/// let config = RegulationConfig::colombia();
/// let result = calculate_batch(
///     &[
///         request("a", "2025-03-04T08:00", "2025-03-04T12:00"),
///         request("b", "2025-03-04T12:00", "2025-03-04T20:00"),
///     ],
///     &config,
/// )
/// .unwrap();
///
/// // 12 hours against a cap of 8: 4 hours of daytime overtime, split 4:8
/// assert_eq!(result.records[0].totals.ordinary_day_overtime, Decimal::new(133, 2));
/// assert_eq!(result.records[1].totals.ordinary_day_overtime, Decimal::new(267, 2));
/// ```
pub fn calculate_batch(
    requests: &[ShiftRequest],
    config: &RegulationConfig,
) -> EngineResult<BatchResult> {
    let started = Instant::now();
    let calculation_id = Uuid::new_v4();
    let mut trace = AuditTrace::default();
    let mut assigned: Vec<Option<RecordTotals>> = vec![None; requests.len()];
    let mut groups: BTreeMap<(String, NaiveDate), WorkdayGroup> = BTreeMap::new();

    for (index, request) in requests.iter().enumerate() {
        let shift = request.parse(config.defaults())?;

        // Without a start punch there is no workday; this fails the presence rule.
        let Some(start) = shift.start else {
            validate_shift(&shift, config)?;
            continue;
        };

        if shift.is_open() {
            warn!(
                calculation_id = %calculation_id,
                record_id = %shift.id,
                operator_id = %shift.operator_id,
                "Skipping open record"
            );
            trace.warnings.push(open_record_warning(&shift, start.date()));
            assigned[index] = Some(excluded(&shift.id, &shift.operator_id, start.date()));
            continue;
        }

        groups
            .entry((shift.operator_id.clone(), start.date()))
            .or_default()
            .push((index, shift));
    }

    let group_count = groups.len();
    for ((operator_id, workday), mut members) in groups {
        members.sort_by_key(|(_, shift)| shift.start);
        for (index, totals) in calculate_group(&operator_id, workday, &members, config, &mut trace)? {
            assigned[index] = Some(totals);
        }
    }

    let records = assigned
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| EngineError::CalculationError {
            message: "A record was left without totals".to_string(),
        })?;

    trace.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    info!(
        calculation_id = %calculation_id,
        records = records.len(),
        groups = group_count,
        warnings = trace.warnings.len(),
        duration_us = trace.duration_us,
        "Batch calculation completed"
    );

    Ok(BatchResult {
        calculation_id,
        timestamp: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        records,
        audit_trace: trace,
    })
}

/// Calculates one operator's workday, returning totals keyed by input index.
///
/// The overlap check runs on the raw punches; records are only validated
/// once the group is known not to overlap.
fn calculate_group(
    operator_id: &str,
    workday: NaiveDate,
    shifts: &[(usize, ParsedShift)],
    config: &RegulationConfig,
    trace: &mut AuditTrace,
) -> EngineResult<Vec<(usize, RecordTotals)>> {
    let punches: Vec<_> = shifts
        .iter()
        .filter_map(|(_, s)| Some((s.id.as_str(), s.start?, s.end?)))
        .collect();
    let overlap = check_overlap(&punches, next_step(trace));
    trace.steps.push(overlap.audit_step);

    if let Some((earlier, later)) = overlap.overlapping {
        warn!(
            operator_id = %operator_id,
            workday = %workday,
            earlier = %earlier,
            later = %later,
            "Overlapping records, workday totals set to zero"
        );
        trace.warnings.push(AuditWarning {
            code: "OVERLAPPING_SHIFTS".to_string(),
            message: format!(
                "{OVERLAP_MESSAGE}: {later} starts before {earlier} ends; all records of operator {operator_id} on {workday} were set to zero"
            ),
            severity: "high".to_string(),
        });
        return Ok(shifts
            .iter()
            .map(|(index, s)| (*index, excluded(&s.id, operator_id, workday)))
            .collect());
    }

    let mut members: Vec<(usize, ShiftRecord)> = Vec::with_capacity(shifts.len());
    for (index, shift) in shifts {
        let record = validate_shift(shift, config)?;
        trace
            .steps
            .push(validation_step(&record, config.strict_validation(), next_step(trace)));
        members.push((*index, record));
    }

    let mut segments = Vec::new();
    for (_, record) in &members {
        let segmentation = segment_shift(record, config, next_step(trace))?;
        trace.steps.push(segmentation.audit_step);
        segments.extend(segmentation.segments);
    }

    // Most worked hours governs; the later record wins a tie.
    let governing = members
        .iter()
        .map(|(_, r)| r)
        .fold(None::<&ShiftRecord>, |best, r| match best {
            Some(b) if r.worked_hours() < b.worked_hours() => Some(b),
            _ => Some(r),
        })
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("Empty workday group for operator {operator_id} on {workday}"),
        })?;

    let anchor = segments
        .first()
        .map(|s| s.start)
        .unwrap_or(governing.start);
    let day = WorkdayContext::new(&anchor, &governing.schedule, config.holidays());

    debug!(
        operator_id = %operator_id,
        workday = %workday,
        records = members.len(),
        governing = %governing.id,
        "Aggregating workday group"
    );

    let aggregation = aggregate(&segments, &day, next_step(trace));
    trace.steps.push(aggregation.audit_step);

    let group_hours: Decimal = members.iter().map(|(_, r)| r.worked_hours()).sum();
    let shares: Vec<(usize, &ShiftRecord, Decimal)> = members
        .iter()
        .map(|(index, r)| {
            let share = if group_hours.is_zero() {
                Decimal::ZERO
            } else {
                r.worked_hours() / group_hours
            };
            (*index, r, share)
        })
        .collect();

    trace.steps.push(proration_step(
        &governing.id,
        &aggregation.totals,
        &shares,
        next_step(trace),
    ));

    Ok(shares
        .into_iter()
        .map(|(index, r, share)| {
            (
                index,
                RecordTotals {
                    record_id: r.id.clone(),
                    operator_id: operator_id.to_string(),
                    workday,
                    worked_hours: round_hours(r.worked_hours()),
                    totals: aggregation.totals.prorate(share),
                },
            )
        })
        .collect())
}

fn proration_step(
    governing_id: &str,
    totals: &CategoryTotals,
    shares: &[(usize, &ShiftRecord, Decimal)],
    step_number: u32,
) -> AuditStep {
    let output: serde_json::Map<String, serde_json::Value> = shares
        .iter()
        .map(|(_, r, share)| {
            let share = serde_json::Value::from(share.round_dp(4).normalize().to_string());
            (r.id.clone(), share)
        })
        .collect();

    AuditStep {
        step_number,
        rule_id: "workday_proration".to_string(),
        rule_name: "Workday Proration".to_string(),
        clause_ref: "CST art. 168".to_string(),
        input: serde_json::json!({
            "governing_record": governing_id,
            "overtime_hours": totals.overtime_hours().normalize().to_string(),
            "surcharge_hours": totals.surcharge_hours().normalize().to_string()
        }),
        output: serde_json::Value::Object(output),
        reasoning: format!(
            "Workday totals shared across {} record(s) by worked hours; {} supplies the schedule",
            shares.len(),
            governing_id
        ),
    }
}
