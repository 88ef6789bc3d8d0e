//! Calculation result models for the overtime engine.
//!
//! This module contains [`CategoryTotals`], the seven statutory buckets that
//! every calculation produces, together with the per-record and batch result
//! types and their audit traces.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timestamp::round_hours;

/// One of the seven surcharge and overtime categories.
///
/// Serialized with the short codes used by the downstream payroll tables.
///
/// # Example
///
/// ```
/// use overtime_engine::models::SurchargeCategory;
///
/// let json = serde_json::to_string(&SurchargeCategory::HolidayNightSurcharge).unwrap();
/// assert_eq!(json, "\"rnf\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurchargeCategory {
    /// Overtime beyond the cap, daytime, non-holiday.
    #[serde(rename = "heod")]
    OrdinaryDayOvertime,
    /// Overtime beyond the cap, nighttime, non-holiday.
    #[serde(rename = "heon")]
    OrdinaryNightOvertime,
    /// Overtime beyond the cap, daytime, holiday.
    #[serde(rename = "hefd")]
    HolidayDayOvertime,
    /// Overtime beyond the cap, nighttime, holiday.
    #[serde(rename = "hefn")]
    HolidayNightOvertime,
    /// Within-cap nighttime hours.
    #[serde(rename = "rno")]
    NightSurcharge,
    /// Within-cap nighttime hours on a holiday segment of a non-holiday day.
    #[serde(rename = "rnf")]
    HolidayNightSurcharge,
    /// Within-cap holiday hours on a holiday day.
    #[serde(rename = "hf")]
    HolidaySurcharge,
}

impl SurchargeCategory {
    /// All categories in their canonical column order.
    pub const ALL: [SurchargeCategory; 7] = [
        SurchargeCategory::OrdinaryDayOvertime,
        SurchargeCategory::OrdinaryNightOvertime,
        SurchargeCategory::HolidayDayOvertime,
        SurchargeCategory::HolidayNightOvertime,
        SurchargeCategory::NightSurcharge,
        SurchargeCategory::HolidayNightSurcharge,
        SurchargeCategory::HolidaySurcharge,
    ];

    /// The short payroll code of the category.
    pub fn code(&self) -> &'static str {
        match self {
            SurchargeCategory::OrdinaryDayOvertime => "heod",
            SurchargeCategory::OrdinaryNightOvertime => "heon",
            SurchargeCategory::HolidayDayOvertime => "hefd",
            SurchargeCategory::HolidayNightOvertime => "hefn",
            SurchargeCategory::NightSurcharge => "rno",
            SurchargeCategory::HolidayNightSurcharge => "rnf",
            SurchargeCategory::HolidaySurcharge => "hf",
        }
    }

    /// Whether the category counts hours beyond the workday cap.
    pub fn is_overtime(&self) -> bool {
        matches!(
            self,
            SurchargeCategory::OrdinaryDayOvertime
                | SurchargeCategory::OrdinaryNightOvertime
                | SurchargeCategory::HolidayDayOvertime
                | SurchargeCategory::HolidayNightOvertime
        )
    }
}

impl std::fmt::Display for SurchargeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Hours classified into the seven statutory categories.
///
/// Every field is always present and defaults to zero. Ordinary daytime
/// hours within the cap are not tracked by any field.
///
/// # Example
///
/// ```
/// use overtime_engine::models::{CategoryTotals, SurchargeCategory};
/// use rust_decimal::Decimal;
///
/// let totals = CategoryTotals::default()
///     .with(SurchargeCategory::NightSurcharge, Decimal::from(2))
///     .with(SurchargeCategory::NightSurcharge, Decimal::from(1));
/// assert_eq!(totals.get(SurchargeCategory::NightSurcharge), Decimal::from(3));
/// assert!(!totals.is_zero());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Ordinary daytime overtime.
    #[serde(rename = "heod", default)]
    pub ordinary_day_overtime: Decimal,
    /// Ordinary nighttime overtime.
    #[serde(rename = "heon", default)]
    pub ordinary_night_overtime: Decimal,
    /// Holiday daytime overtime.
    #[serde(rename = "hefd", default)]
    pub holiday_day_overtime: Decimal,
    /// Holiday nighttime overtime.
    #[serde(rename = "hefn", default)]
    pub holiday_night_overtime: Decimal,
    /// Night surcharge.
    #[serde(rename = "rno", default)]
    pub night_surcharge: Decimal,
    /// Holiday night surcharge.
    #[serde(rename = "rnf", default)]
    pub holiday_night_surcharge: Decimal,
    /// Holiday surcharge.
    #[serde(rename = "hf", default)]
    pub holiday_surcharge: Decimal,
}

impl CategoryTotals {
    /// Returns the hours recorded for `category`.
    pub fn get(&self, category: SurchargeCategory) -> Decimal {
        match category {
            SurchargeCategory::OrdinaryDayOvertime => self.ordinary_day_overtime,
            SurchargeCategory::OrdinaryNightOvertime => self.ordinary_night_overtime,
            SurchargeCategory::HolidayDayOvertime => self.holiday_day_overtime,
            SurchargeCategory::HolidayNightOvertime => self.holiday_night_overtime,
            SurchargeCategory::NightSurcharge => self.night_surcharge,
            SurchargeCategory::HolidayNightSurcharge => self.holiday_night_surcharge,
            SurchargeCategory::HolidaySurcharge => self.holiday_surcharge,
        }
    }

    fn slot(&mut self, category: SurchargeCategory) -> &mut Decimal {
        match category {
            SurchargeCategory::OrdinaryDayOvertime => &mut self.ordinary_day_overtime,
            SurchargeCategory::OrdinaryNightOvertime => &mut self.ordinary_night_overtime,
            SurchargeCategory::HolidayDayOvertime => &mut self.holiday_day_overtime,
            SurchargeCategory::HolidayNightOvertime => &mut self.holiday_night_overtime,
            SurchargeCategory::NightSurcharge => &mut self.night_surcharge,
            SurchargeCategory::HolidayNightSurcharge => &mut self.holiday_night_surcharge,
            SurchargeCategory::HolidaySurcharge => &mut self.holiday_surcharge,
        }
    }

    /// Returns a copy with `hours` added to `category`.
    #[must_use]
    pub fn with(mut self, category: SurchargeCategory, hours: Decimal) -> Self {
        *self.slot(category) += hours;
        self
    }

    /// Scales every category by `share`, rounding each field to two decimal
    /// places on its own.
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_engine::models::{CategoryTotals, SurchargeCategory};
    /// use rust_decimal::Decimal;
    ///
    /// let totals = CategoryTotals::default()
    ///     .with(SurchargeCategory::OrdinaryDayOvertime, Decimal::from(4));
    /// let share = Decimal::from(1) / Decimal::from(3);
    /// let prorated = totals.prorate(share);
    /// assert_eq!(prorated.ordinary_day_overtime, Decimal::new(133, 2));
    /// ```
    #[must_use]
    pub fn prorate(&self, share: Decimal) -> Self {
        SurchargeCategory::ALL
            .iter()
            .fold(CategoryTotals::default(), |acc, &category| {
                acc.with(category, round_hours(self.get(category) * share))
            })
    }

    /// Sum of the four overtime categories.
    pub fn overtime_hours(&self) -> Decimal {
        SurchargeCategory::ALL
            .iter()
            .filter(|c| c.is_overtime())
            .map(|&c| self.get(c))
            .sum()
    }

    /// Sum of the three surcharge categories.
    pub fn surcharge_hours(&self) -> Decimal {
        SurchargeCategory::ALL
            .iter()
            .filter(|c| !c.is_overtime())
            .map(|&c| self.get(c))
            .sum()
    }

    /// Whether every category is zero.
    pub fn is_zero(&self) -> bool {
        SurchargeCategory::ALL
            .iter()
            .all(|&c| self.get(c).is_zero())
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute article for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't stop the batch but zero out or
/// skip some records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The prorated totals assigned to one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTotals {
    /// The source record identifier.
    pub record_id: String,
    /// The operator the record belongs to.
    pub operator_id: String,
    /// The workday the record was grouped into.
    pub workday: NaiveDate,
    /// Hours worked on this record, break excluded, rounded to two places.
    pub worked_hours: Decimal,
    /// This record's share of its workday's totals.
    pub totals: CategoryTotals,
}

/// The complete result of a batch calculation.
///
/// # Example
///
/// ```
/// use overtime_engine::models::{AuditTrace, BatchResult};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let result = BatchResult {
///     calculation_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     records: vec![],
///     audit_trace: AuditTrace::default(),
/// };
/// assert!(result.records.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// One entry per input record, in input order.
    pub records: Vec<RecordTotals>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl BatchResult {
    /// Looks up the totals assigned to a record.
    pub fn record(&self, record_id: &str) -> Option<&RecordTotals> {
        self.records.iter().find(|r| r.record_id == record_id)
    }
}
