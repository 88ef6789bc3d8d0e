//! Calculation logic for the overtime engine.
//!
//! The pipeline runs leaves first:
//! - [`validate_shift`] checks a parsed record and produces a [`ShiftRecord`](crate::models::ShiftRecord).
//! - [`build_segments`] splits a record into time band [`Segment`]s.
//! - [`aggregate`] walks a workday's segments against its cap and fills the
//!   seven category buckets.
//! - [`calculate_batch`] groups records into workdays, aggregates each once
//!   and prorates the totals back to the records.
//!
//! [`calculate_shift`] runs the same pipeline for a single record.

mod aggregator;
mod coordinator;
mod range_factory;
mod single_shift;
mod validation;

pub use aggregator::{Aggregation, WorkdayContext, aggregate};
pub use coordinator::{ENGINE_VERSION, calculate_batch};
pub use range_factory::{Segment, Segmentation, build_segments, segment_hours, segment_shift};
pub use single_shift::{ShiftCalculation, calculate_record, calculate_shift};
pub use validation::{
    MAX_SHIFT_HOURS, OVERLAP_MESSAGE, OverlapCheck, SHIFT_RULES, ShiftRule, check_overlap,
    find_overlap, validate_shift, validation_step,
};
