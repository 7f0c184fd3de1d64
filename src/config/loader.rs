//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading an economic
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};

use super::holidays::HolidayCalendar;
use super::types::{
    ContributionRates, EconomicConfig, Indicators, LegalCaps, PensionFunds, TaxBracketsConfig,
    VacationFactors,
};

/// Structure of `indicators.yaml`.
#[derive(Debug, Clone, Deserialize)]
struct IndicatorsFile {
    indicators: Indicators,
    caps: LegalCaps,
    rates: ContributionRates,
    vacation: VacationFactors,
}

/// Structure of `holidays.yaml`.
#[derive(Debug, Clone, Deserialize)]
struct HolidaysFile {
    #[serde(default)]
    holidays: Vec<String>,
}

/// Loads and provides access to an economic configuration.
///
/// # Directory Structure
///
/// ```text
/// config/cl/
/// ├── indicators.yaml     # UF, UTM, IMM, legal caps, rates, vacation factors
/// ├── tax_brackets.yaml   # Second-category income tax table
/// ├── pension_funds.yaml  # AFP rates and default provider
/// └── holidays.yaml       # Optional list of ISO holiday dates
/// ```
///
/// A missing `holidays.yaml` is not an error: the calendar is then empty and
/// only weekends count as non-business days.
///
/// # Example
///
/// ```no_run
/// use chile_labor_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/cl").unwrap();
/// println!("UF: {}", loader.config().uf());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EconomicConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The resulting configuration fails [`EconomicConfig::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let indicators_file = Self::load_yaml::<IndicatorsFile>(&path.join("indicators.yaml"))?;
        let brackets = Self::load_yaml::<TaxBracketsConfig>(&path.join("tax_brackets.yaml"))?;
        let pension_funds = Self::load_yaml::<PensionFunds>(&path.join("pension_funds.yaml"))?;
        let holidays = Self::load_holidays(&path.join("holidays.yaml"))?;

        let config = EconomicConfig::new(
            indicators_file.indicators,
            indicators_file.caps,
            indicators_file.rates,
            indicators_file.vacation,
            brackets.brackets,
            pension_funds,
            holidays,
        );
        config.validate()?;

        info!(
            path = %path.display(),
            uf = %config.uf(),
            utm = %config.utm(),
            brackets = config.tax_brackets().len(),
            holidays = config.holidays().len(),
            "Economic configuration loaded"
        );

        Ok(Self { config })
    }

    /// Wraps an already built configuration, validating it first.
    pub fn from_config(config: EconomicConfig) -> EngineResult<Self> {
        config.validate()?;
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

    /// Loads the holiday list, tolerating its absence.
    fn load_holidays(path: &Path) -> EngineResult<HolidayCalendar> {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Holiday file not found, only weekends will be non-business days"
            );
            return Ok(HolidayCalendar::default());
        }

        let file = Self::load_yaml::<HolidaysFile>(path)?;
        Ok(HolidayCalendar::from_iso_strings(&file.holidays))
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EconomicConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EconomicConfig {
        self.config
    }
}
