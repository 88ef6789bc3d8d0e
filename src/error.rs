//! Error types for the overtime engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while classifying worked hours.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// The main error type for the overtime engine.
///
/// Per-record validation failures surface as [`EngineError::ShiftValidation`],
/// whose `Display` output is exactly the violated rule's message so callers
/// can show it verbatim.
///
/// # Example
///
/// ```
/// use overtime_engine::error::EngineError;
///
/// let error = EngineError::ShiftValidation {
///     shift_id: "rec_001".to_string(),
///     rule: "start_before_end",
///     message: "La hora de inicio debe ser anterior a la hora de fin".to_string(),
/// };
/// assert_eq!(error.to_string(), "La hora de inicio debe ser anterior a la hora de fin");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A timestamp did not match any accepted text format.
    #[error(
        "Timestamp '{value}' must use the format YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS] and represent a valid date"
    )]
    InvalidTimestamp {
        /// The offending text.
        value: String,
    },

    /// A shift violated one of the per-record validation rules.
    #[error("{message}")]
    ShiftValidation {
        /// The ID of the invalid shift.
        shift_id: String,
        /// Stable identifier of the violated rule.
        rule: &'static str,
        /// The rule's message.
        message: String,
    },

    /// No configured time band covers the given time of day.
    #[error("No time band covers {time} on {date}")]
    NoTimeBand {
        /// The calendar day that was looked up.
        date: NaiveDate,
        /// The uncovered time of day.
        time: NaiveTime,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
