//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading regulation
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use chrono::Datelike;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, HolidaySet};

use super::types::{
    BoundaryTable, HolidayFile, OrdinaryHoursFile, RegulationConfig, RegulationFile,
    RegulationMetadata, TimeBandsFile,
};

/// Loads a regulation configuration from a directory of YAML files.
///
/// # Directory Structure
///
/// ```text
/// config/co/
/// ├── regulation.yaml      # Metadata, schedule defaults, strict mode
/// ├── time_bands.yaml      # Effective-dated day/night windows
/// ├── ordinary_hours.yaml  # Effective-dated weekly/monthly caps
/// └── holidays/
///     ├── 2025.yaml        # One file per year
///     └── 2026.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use overtime_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/co").unwrap();
/// println!("Regulation: {}", loader.regulation().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RegulationConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A time band window is empty or runs past midnight
    ///
    /// # Example
    ///
    /// ```no_run
    /// use overtime_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/co")?;
    /// # Ok::<(), overtime_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let regulation = Self::load_yaml::<RegulationFile>(&path.join("regulation.yaml"))?;

        let bands_path = path.join("time_bands.yaml");
        let bands = Self::load_yaml::<TimeBandsFile>(&bands_path)?;
        let time_bands = BoundaryTable::new(bands.time_bands).map_err(|e| {
            EngineError::ConfigParseError {
                path: bands_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let ordinary_hours =
            Self::load_yaml::<OrdinaryHoursFile>(&path.join("ordinary_hours.yaml"))?;

        let holidays = Self::load_holidays(&path.join("holidays"))?;

        debug!(
            code = %regulation.regulation.code,
            time_bands = time_bands.rules().len(),
            holidays = holidays.len(),
            "Loaded regulation configuration"
        );

        let config = RegulationConfig::new(
            regulation.regulation,
            regulation.defaults,
            time_bands,
            ordinary_hours.ordinary_hours,
            HolidaySet::new(holidays),
        )
        .with_strict_validation(regulation.strict_validation);

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every yearly holiday file from the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<Vec<Holiday>> {
        let holidays_dir_str = holidays_dir.display().to_string();

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: holidays_dir_str.clone(),
        })?;

        let mut holidays = Vec::new();
        let mut files = 0;

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: holidays_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let file = Self::load_yaml::<HolidayFile>(&path)?;
                if let Some(stray) = file.holidays.iter().find(|h| h.date.year() != file.year) {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!("{} is not in {}", stray.date, file.year),
                    });
                }
                holidays.extend(file.holidays);
                files += 1;
            }
        }

        if files == 0 {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no holiday files found)", holidays_dir_str),
            });
        }

        Ok(holidays)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &RegulationConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> RegulationConfig {
        self.config
    }

    /// Returns the regulation metadata.
    pub fn regulation(&self) -> &RegulationMetadata {
        self.config.metadata()
    }
}
