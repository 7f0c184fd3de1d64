//! Built-in configuration, valid for February 2026.
//!
//! These values are the last link of the fallback chain: they are used when
//! no configuration directory is given and no fetched or cached indicators
//! are available.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::holidays::HolidayCalendar;
use super::types::{
    ContributionRates, EconomicConfig, Indicators, LegalCaps, PensionFunds, TaxBracket,
    VacationFactors,
};

/// Pension fund used when a requested provider is not configured.
pub const DEFAULT_PENSION_PROVIDER: &str = "Modelo";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Valid built-in calendar date")
}

/// Built-in economic indicators.
pub fn default_indicators() -> Indicators {
    Indicators {
        uf: Decimal::new(3968299, 2),
        utm: Decimal::new(69611, 0),
        imm: Decimal::new(539000, 0),
        effective_date: date(2026, 2, 1),
    }
}

/// Second-category income tax brackets, monthly, in pesos.
pub fn default_tax_brackets() -> Vec<TaxBracket> {
    let bracket = |limit: Option<Decimal>, rate: Decimal, rebate: Decimal| TaxBracket {
        upper_limit: limit,
        rate,
        rebate,
    };

    vec![
        bracket(Some(Decimal::new(93974850, 2)), Decimal::ZERO, Decimal::ZERO),
        bracket(
            Some(Decimal::new(2088330, 0)),
            Decimal::new(4, 2),
            Decimal::new(3758994, 2),
        ),
        bracket(
            Some(Decimal::new(3480550, 0)),
            Decimal::new(8, 2),
            Decimal::new(12112314, 2),
        ),
        bracket(
            Some(Decimal::new(4872770, 0)),
            Decimal::new(135, 3),
            Decimal::new(31255339, 2),
        ),
        bracket(
            Some(Decimal::new(6264990, 0)),
            Decimal::new(23, 2),
            Decimal::new(77546654, 2),
        ),
        bracket(
            Some(Decimal::new(8353320, 0)),
            Decimal::new(304, 3),
            Decimal::new(12390758, 1),
        ),
        bracket(
            Some(Decimal::new(21579410, 0)),
            Decimal::new(35, 2),
            Decimal::new(162332852, 2),
        ),
        bracket(None, Decimal::new(40, 2), Decimal::new(270229902, 2)),
    ]
}

/// AFP contribution rates (10% mandatory plus each fund's commission).
pub fn default_pension_funds() -> PensionFunds {
    let rates = [
        ("Capital", 1144),
        ("Cuprum", 1144),
        ("Habitat", 1127),
        ("Modelo", 1058),
        ("Planvital", 1116),
        ("Provida", 1145),
        ("Uno", 1069),
    ];

    PensionFunds {
        default_provider: DEFAULT_PENSION_PROVIDER.to_string(),
        rates: rates
            .into_iter()
            .map(|(name, rate)| (name.to_string(), Decimal::new(rate, 4)))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// National holidays for 2026.
pub fn chile_holidays_2026() -> HolidayCalendar {
    HolidayCalendar::new([
        date(2026, 1, 1),
        date(2026, 4, 3),
        date(2026, 4, 4),
        date(2026, 5, 1),
        date(2026, 5, 21),
        date(2026, 6, 21),
        date(2026, 6, 29),
        date(2026, 7, 16),
        date(2026, 8, 15),
        date(2026, 9, 18),
        date(2026, 9, 19),
        date(2026, 10, 12),
        date(2026, 10, 31),
        date(2026, 11, 1),
        date(2026, 12, 8),
        date(2026, 12, 25),
    ])
}

impl Default for EconomicConfig {
    fn default() -> Self {
        EconomicConfig::new(
            default_indicators(),
            LegalCaps {
                pension_health_uf: Decimal::new(899, 1),
                unemployment_uf: Decimal::new(1351, 1),
                severance_uf: Decimal::new(90, 0),
                gratification_imm: Decimal::new(475, 2),
            },
            ContributionRates {
                health: Decimal::new(7, 2),
                unemployment_indefinite_worker: Decimal::new(6, 3),
                unemployment_fixed_term_worker: Decimal::ZERO,
                overtime_hourly_factor: Decimal::new(89286, 7),
            },
            VacationFactors {
                standard: Decimal::new(125, 2),
                extreme_zone: Decimal::new(167, 2),
            },
            default_tax_brackets(),
            default_pension_funds(),
            chile_holidays_2026(),
        )
    }
}
