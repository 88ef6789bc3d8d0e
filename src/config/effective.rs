//! Effective-dated lookups.
//!
//! Regulation tables change over time without retroactive effect: a shift is
//! always judged by the entry in force on its own calendar day. Every such
//! table goes through [`latest_effective`].

use chrono::NaiveDate;

/// An entry that comes into force on a given date.
pub trait EffectiveDated {
    /// The first calendar day the entry applies to.
    fn effective_from(&self) -> NaiveDate;
}

/// Selects the entry with the latest `effective_from` not after `date`.
///
/// Entries may arrive in any order. When several share the winning date the
/// last one wins.
///
/// # Example
///
/// ```
/// use overtime_engine::config::{latest_effective, OrdinaryHoursCap};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let caps = vec![
///     OrdinaryHoursCap {
///         effective_from: NaiveDate::from_ymd_opt(2025, 7, 16).unwrap(),
///         weekly_max_hours: Decimal::from(44),
///         monthly_max_hours: Decimal::from(220),
///     },
///     OrdinaryHoursCap {
///         effective_from: NaiveDate::from_ymd_opt(2024, 7, 16).unwrap(),
///         weekly_max_hours: Decimal::from(46),
///         monthly_max_hours: Decimal::from(230),
///     },
/// ];
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let cap = latest_effective(&caps, date).unwrap();
/// assert_eq!(cap.weekly_max_hours, Decimal::from(46));
/// ```
pub fn latest_effective<'a, T, I>(entries: I, date: NaiveDate) -> Option<&'a T>
where
    T: EffectiveDated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries
        .into_iter()
        .filter(|entry| entry.effective_from() <= date)
        .max_by_key(|entry| entry.effective_from())
}
