//! Built-in Colombian regulation tables.
//!
//! These mirror `config/co/` so the engine works without a configuration
//! directory. Night work starts at 21:00 until 2025-12-24 and at 19:00 from
//! 2025-12-25 (Ley 2466 de 2025).

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Holiday, HolidaySet, WeeklySchedule};

use super::types::{
    BoundaryRule, BoundaryTable, OrdinaryHoursCap, RegulationConfig, RegulationMetadata, TimeBand,
};

const HOLIDAYS: [(&str, &str); 35] = [
    ("2025-01-01", "Año Nuevo"),
    ("2025-01-06", "Día de los Reyes Magos"),
    ("2025-03-24", "Día de San José"),
    ("2025-04-17", "Jueves Santo"),
    ("2025-04-18", "Viernes Santo"),
    ("2025-05-01", "Día del Trabajo"),
    ("2025-06-02", "Ascensión del Señor"),
    ("2025-06-23", "Corpus Christi"),
    ("2025-06-30", "Sagrado Corazón / San Pedro y San Pablo"),
    ("2025-07-20", "Día de la Independencia"),
    ("2025-08-07", "Batalla de Boyacá"),
    ("2025-08-18", "La Asunción de la Virgen"),
    ("2025-10-13", "Día de la Raza"),
    ("2025-11-03", "Todos los Santos"),
    ("2025-11-17", "Independencia de Cartagena"),
    ("2025-12-08", "Inmaculada Concepción"),
    ("2025-12-25", "Navidad"),
    ("2026-01-01", "Año Nuevo"),
    ("2026-01-12", "Día de los Reyes Magos"),
    ("2026-03-23", "Día de San José"),
    ("2026-04-02", "Jueves Santo"),
    ("2026-04-03", "Viernes Santo"),
    ("2026-05-01", "Día del Trabajo"),
    ("2026-05-18", "Ascensión del Señor"),
    ("2026-06-08", "Corpus Christi"),
    ("2026-06-15", "Sagrado Corazón"),
    ("2026-06-29", "San Pedro y San Pablo"),
    ("2026-07-20", "Día de la Independencia"),
    ("2026-08-07", "Batalla de Boyacá"),
    ("2026-08-17", "La Asunción de la Virgen"),
    ("2026-10-12", "Día de la Raza"),
    ("2026-11-02", "Todos los Santos"),
    ("2026-11-16", "Independencia de Cartagena"),
    ("2026-12-08", "Inmaculada Concepción"),
    ("2026-12-25", "Navidad"),
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn band(band: TimeBand, start_hour: u32, end_hour: u32, effective_from: NaiveDate) -> BoundaryRule {
    BoundaryRule {
        band,
        start_hour,
        end_hour,
        effective_from,
    }
}

/// The statutory time band windows.
pub fn time_band_rules() -> Vec<BoundaryRule> {
    let epoch = date(1970, 1, 1);
    let reform = date(2025, 12, 25);
    vec![
        band(TimeBand::Daytime, 6, 21, epoch),
        band(TimeBand::Nighttime, 21, 24, epoch),
        band(TimeBand::Nighttime, 0, 6, epoch),
        band(TimeBand::Daytime, 6, 19, reform),
        band(TimeBand::Nighttime, 19, 24, reform),
    ]
}

/// The phased reduction of the ordinary working week (Ley 2101 de 2021).
pub fn ordinary_hours_caps() -> Vec<OrdinaryHoursCap> {
    [
        (date(2026, 7, 16), 42, 210),
        (date(2025, 7, 16), 44, 220),
        (date(2024, 7, 16), 46, 230),
        (date(2023, 7, 16), 47, 235),
        (date(1970, 1, 1), 48, 240),
    ]
    .into_iter()
    .map(|(effective_from, weekly, monthly)| OrdinaryHoursCap {
        effective_from,
        weekly_max_hours: Decimal::from(weekly),
        monthly_max_hours: Decimal::from(monthly),
    })
    .collect()
}

/// National holidays for the years the engine ships with.
pub fn holidays() -> Vec<Holiday> {
    HOLIDAYS
        .iter()
        .filter_map(|(day, name)| {
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .ok()
                .map(|date| Holiday {
                    date,
                    name: name.to_string(),
                })
        })
        .collect()
}

/// Monday to Friday 8 hours, Saturday 4, holidays 8.
pub fn default_schedule() -> WeeklySchedule {
    WeeklySchedule {
        weekly_hours: [0u32, 8, 8, 8, 8, 8, 4].map(Decimal::from),
        holiday_cap: Decimal::from(8),
    }
}

impl RegulationConfig {
    /// The built-in Colombian regulation.
    pub fn colombia() -> Self {
        let metadata = RegulationMetadata {
            code: "CO-CST".to_string(),
            name: "Código Sustantivo del Trabajo".to_string(),
            version: "2025-12-25".to_string(),
            source_url: "http://www.secretariasenado.gov.co/senado/basedoc/codigo_sustantivo_trabajo.html"
                .to_string(),
        };
        RegulationConfig::new(
            metadata,
            default_schedule(),
            BoundaryTable::from_checked(time_band_rules()),
            ordinary_hours_caps(),
            HolidaySet::new(holidays()),
        )
    }
}

impl Default for RegulationConfig {
    fn default() -> Self {
        Self::colombia()
    }
}
