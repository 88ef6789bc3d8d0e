//! Core data models for the overtime engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod holiday;
mod shift;
mod timestamp;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, BatchResult, CategoryTotals, RecordTotals,
    SurchargeCategory,
};
pub use holiday::{Holiday, HolidaySet};
pub use shift::{ParsedShift, ShiftBreak, ShiftRecord, ShiftRequest, WeeklySchedule};
pub use timestamp::Timestamp;
pub(crate) use timestamp::round_hours;
