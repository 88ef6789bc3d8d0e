//! Configuration types for the regulation tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the assembled
//! [`RegulationConfig`] the calculations read from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, HolidaySet, Timestamp, WeeklySchedule};

use super::effective::{EffectiveDated, latest_effective};

/// Time-of-day category of a stretch of work.
///
/// # Example
///
/// ```
/// use overtime_engine::config::TimeBand;
///
/// assert_eq!(TimeBand::Nighttime.to_string(), "Nighttime");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    /// Daytime hours.
    Daytime,
    /// Nighttime hours, which carry the night surcharge.
    Nighttime,
}

impl std::fmt::Display for TimeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeBand::Daytime => write!(f, "Daytime"),
            TimeBand::Nighttime => write!(f, "Nighttime"),
        }
    }
}

/// A time-of-day window `[start_hour, end_hour)` with its band, in force
/// from `effective_from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryRule {
    /// The band hours in this window belong to.
    pub band: TimeBand,
    /// First hour of the window, inclusive.
    pub start_hour: u32,
    /// Last hour of the window, exclusive; 24 means midnight.
    pub end_hour: u32,
    /// The first calendar day the window applies to.
    pub effective_from: NaiveDate,
}

impl BoundaryRule {
    /// Whether the window contains the given time of day.
    pub fn contains(&self, seconds_of_day: u32) -> bool {
        self.start_hour * 3600 <= seconds_of_day && seconds_of_day < self.end_hour * 3600
    }
}

impl EffectiveDated for BoundaryRule {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
}

/// The effective-dated table of time bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryTable {
    rules: Vec<BoundaryRule>,
}

impl BoundaryTable {
    /// Builds a table, rejecting windows that are empty or run past midnight.
    pub fn new(rules: Vec<BoundaryRule>) -> EngineResult<Self> {
        if let Some(bad) = rules
            .iter()
            .find(|r| r.start_hour >= r.end_hour || r.end_hour > 24)
        {
            return Err(EngineError::CalculationError {
                message: format!(
                    "Invalid time band window {}-{} effective {}",
                    bad.start_hour, bad.end_hour, bad.effective_from
                ),
            });
        }
        Ok(Self { rules })
    }

    /// Builds a table from windows already known to be well formed.
    pub(crate) fn from_checked(rules: Vec<BoundaryRule>) -> Self {
        debug_assert!(rules.iter().all(|r| r.start_hour < r.end_hour && r.end_hour <= 24));
        Self { rules }
    }

    /// Returns all rules in the table.
    pub fn rules(&self) -> &[BoundaryRule] {
        &self.rules
    }

    /// The rule applying at `instant`: among windows containing its time of
    /// day, the one most recently in force on its calendar day.
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_engine::config::{RegulationConfig, TimeBand};
    /// use overtime_engine::models::Timestamp;
    ///
    /// let config = RegulationConfig::colombia();
    /// let before = Timestamp::parse("2025-12-24T20:00").unwrap();
    /// let after = Timestamp::parse("2025-12-26T20:00").unwrap();
    /// assert_eq!(config.time_bands().rule_at(&before).unwrap().band, TimeBand::Daytime);
    /// assert_eq!(config.time_bands().rule_at(&after).unwrap().band, TimeBand::Nighttime);
    /// ```
    pub fn rule_at(&self, instant: &Timestamp) -> EngineResult<&BoundaryRule> {
        let seconds = instant.seconds_of_day();
        latest_effective(
            self.rules.iter().filter(|r| r.contains(seconds)),
            instant.date(),
        )
        .ok_or_else(|| EngineError::NoTimeBand {
            date: instant.date(),
            time: instant.time(),
        })
    }
}

/// Statutory ordinary-hours caps in force from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinaryHoursCap {
    /// The first calendar day the caps apply to.
    pub effective_from: NaiveDate,
    /// Maximum ordinary hours per week.
    pub weekly_max_hours: Decimal,
    /// Maximum ordinary hours per month.
    pub monthly_max_hours: Decimal,
}

impl EffectiveDated for OrdinaryHoursCap {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
}

/// Metadata about the regulation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegulationMetadata {
    /// Short code (e.g., "CO-CST").
    pub code: String,
    /// The human-readable name.
    pub name: String,
    /// The version or last revision date.
    pub version: String,
    /// URL to the official text.
    pub source_url: String,
}

/// `regulation.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RegulationFile {
    /// Regulation metadata.
    pub regulation: RegulationMetadata,
    /// Schedule applied to records that carry none of their own.
    pub defaults: WeeklySchedule,
    /// Whether the optional weekly-hours and 24-hour rules are enforced.
    #[serde(default)]
    pub strict_validation: bool,
}

/// `time_bands.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeBandsFile {
    /// The time band windows.
    pub time_bands: Vec<BoundaryRule>,
}

/// `ordinary_hours.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdinaryHoursFile {
    /// The effective-dated caps.
    pub ordinary_hours: Vec<OrdinaryHoursCap>,
}

/// A `holidays/<year>.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayFile {
    /// The year the file lists.
    pub year: i32,
    /// The holidays of that year.
    pub holidays: Vec<Holiday>,
}

/// The complete regulation configuration.
#[derive(Debug, Clone)]
pub struct RegulationConfig {
    metadata: RegulationMetadata,
    defaults: WeeklySchedule,
    strict_validation: bool,
    time_bands: BoundaryTable,
    ordinary_hours: Vec<OrdinaryHoursCap>,
    holidays: HolidaySet,
}

impl RegulationConfig {
    /// Creates a new RegulationConfig from its component parts.
    pub fn new(
        metadata: RegulationMetadata,
        defaults: WeeklySchedule,
        time_bands: BoundaryTable,
        ordinary_hours: Vec<OrdinaryHoursCap>,
        holidays: HolidaySet,
    ) -> Self {
        Self {
            metadata,
            defaults,
            strict_validation: false,
            time_bands,
            ordinary_hours,
            holidays,
        }
    }

    /// Returns a copy with strict validation switched on or off.
    #[must_use]
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Returns a copy using a different holiday set.
    #[must_use]
    pub fn with_holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = holidays;
        self
    }

    /// Returns the regulation metadata.
    pub fn metadata(&self) -> &RegulationMetadata {
        &self.metadata
    }

    /// Returns the schedule used when a record carries none.
    pub fn defaults(&self) -> &WeeklySchedule {
        &self.defaults
    }

    /// Whether the optional validation rules are enforced.
    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }

    /// Returns the time band table.
    pub fn time_bands(&self) -> &BoundaryTable {
        &self.time_bands
    }

    /// Returns the holiday set.
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// The ordinary-hours caps in force on `date`.
    pub fn ordinary_hours_cap(&self, date: NaiveDate) -> Option<&OrdinaryHoursCap> {
        latest_effective(&self.ordinary_hours, date)
    }
}
