//! Economic configuration for the labor entitlements engine.
//!
//! This module provides the immutable [`EconomicConfig`] snapshot consumed by
//! both engines, its built-in defaults, the holiday calendar, and a loader for
//! configuration directories of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use chile_labor_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/cl").unwrap().into_config();
//! println!("UF {} / UTM {}", config.uf(), config.utm());
//! ```

mod defaults;
mod holidays;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_PENSION_PROVIDER, chile_holidays_2026, default_indicators, default_pension_funds,
    default_tax_brackets,
};
pub use holidays::{HolidayCalendar, is_weekend};
pub use loader::ConfigLoader;
pub use types::{
    ContributionRates, EconomicConfig, Indicators, LegalCaps, PensionFunds, TaxBracket,
    TaxBracketsConfig, VacationFactors,
};
