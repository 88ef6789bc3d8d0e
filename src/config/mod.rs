//! Regulation configuration for the overtime engine.
//!
//! The engine reads its time bands, ordinary-hours caps, holidays and
//! schedule defaults from a [`RegulationConfig`]. One can be loaded from a
//! directory of YAML files with [`ConfigLoader`], or taken from the built-in
//! Colombian tables with [`RegulationConfig::colombia`].
//!
//! # Example
//!
//! ```no_run
//! use overtime_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/co").unwrap();
//! println!("Loaded regulation: {}", config.regulation().name);
//! ```

mod colombia;
mod effective;
mod loader;
mod types;

pub use colombia::{default_schedule, holidays, ordinary_hours_caps, time_band_rules};
pub use effective::{EffectiveDated, latest_effective};
pub use loader::ConfigLoader;
pub use types::{
    BoundaryRule, BoundaryTable, HolidayFile, OrdinaryHoursCap, OrdinaryHoursFile,
    RegulationConfig, RegulationFile, RegulationMetadata, TimeBand, TimeBandsFile,
};
