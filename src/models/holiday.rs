//! Holiday models.
//!
//! This module contains the [`Holiday`] and [`HolidaySet`] types. Holidays are
//! matched by exact calendar day; there is no recurrence logic, so every year
//! lists its own dates.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

use super::Timestamp;

/// A single non-working public holiday.
///
/// # Example
///
/// ```
/// use overtime_engine::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2025, 7, 20).unwrap(),
///     name: "Día de la Independencia".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The calendar day of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// An unordered collection of holiday dates.
///
/// Sundays are holidays regardless of membership; see
/// [`Timestamp::is_holiday`].
///
/// # Example
///
/// ```
/// use overtime_engine::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// let holidays = HolidaySet::from_date_strings(&["2025-12-08", "2025-12-25"]).unwrap();
/// assert!(holidays.contains(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()));
/// assert!(!holidays.contains(NaiveDate::from_ymd_opt(2024, 12, 26).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: HashSet<NaiveDate>,
}

impl HolidaySet {
    /// Builds a set from named holidays.
    pub fn new(holidays: impl IntoIterator<Item = Holiday>) -> Self {
        Self {
            dates: holidays.into_iter().map(|h| h.date).collect(),
        }
    }

    /// Builds a set from date strings; any time component is ignored.
    pub fn from_date_strings<S: AsRef<str>>(dates: &[S]) -> EngineResult<Self> {
        let dates = dates
            .iter()
            .map(|text| Timestamp::parse(text.as_ref()).map(|ts| ts.date()))
            .collect::<EngineResult<HashSet<_>>>()?;
        Ok(Self { dates })
    }

    /// Whether `date` is listed.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// The number of listed dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether no dates are listed.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Extend<Holiday> for HolidaySet {
    fn extend<T: IntoIterator<Item = Holiday>>(&mut self, iter: T) {
        self.dates.extend(iter.into_iter().map(|h| h.date));
    }
}
