//! Configuration types for the labor entitlements engine.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from YAML configuration files, and the [`EconomicConfig`]
//! snapshot that every engine call receives.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::holidays::HolidayCalendar;

/// Daily and monthly economic indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// Unidad de Fomento, the daily-indexed currency unit used for legal caps.
    pub uf: Decimal,
    /// Unidad Tributaria Mensual, the monthly tax unit.
    pub utm: Decimal,
    /// Ingreso Mínimo Mensual, the statutory minimum wage.
    pub imm: Decimal,
    /// The date the values were published for.
    pub effective_date: NaiveDate,
}

/// Legal caps ("topes imponibles"), expressed as multiples of UF or IMM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalCaps {
    /// Pension and health contribution cap, in UF.
    pub pension_health_uf: Decimal,
    /// Unemployment insurance contribution cap, in UF.
    pub unemployment_uf: Decimal,
    /// Severance indemnity base cap, in UF (Art. 172).
    pub severance_uf: Decimal,
    /// Annual gratification cap, in IMM (Art. 50).
    pub gratification_imm: Decimal,
}

/// Statutory contribution rates and factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// Mandatory health contribution (7%).
    pub health: Decimal,
    /// Worker share of unemployment insurance for indefinite contracts.
    pub unemployment_indefinite_worker: Decimal,
    /// Worker share of unemployment insurance for fixed-term contracts.
    pub unemployment_fixed_term_worker: Decimal,
    /// Overtime hourly factor applied to the monthly base salary.
    pub overtime_hourly_factor: Decimal,
}

/// Vacation accrual factors, in business days per month of service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacationFactors {
    /// Standard accrual (15 days a year).
    pub standard: Decimal,
    /// Extreme-zone accrual (20 days a year).
    pub extreme_zone: Decimal,
}

/// A single bracket of the second-category income tax table.
///
/// # Example
///
/// ```
/// use chile_labor_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracket {
///     upper_limit: Some(Decimal::new(93974850, 2)),
///     rate: Decimal::ZERO,
///     rebate: Decimal::ZERO,
/// };
/// assert!(bracket.contains(Decimal::new(93974850, 2)));
/// assert!(!bracket.contains(Decimal::new(93974851, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper limit in pesos; `None` marks the unbounded top bracket.
    #[serde(default)]
    pub upper_limit: Option<Decimal>,
    /// Marginal rate for the bracket.
    pub rate: Decimal,
    /// Amount rebated after applying the rate.
    pub rebate: Decimal,
}

impl TaxBracket {
    /// Returns true if a tax base falls within this bracket's upper limit.
    pub fn contains(&self, tax_base: Decimal) -> bool {
        match self.upper_limit {
            Some(limit) => tax_base <= limit,
            None => true,
        }
    }
}

/// Tax brackets file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracketsConfig {
    /// Brackets in ascending order of upper limit.
    pub brackets: Vec<TaxBracket>,
}

/// Pension fund (AFP) contribution rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionFunds {
    /// The provider whose rate applies when the requested one is unknown.
    pub default_provider: String,
    /// Map of provider name to total contribution rate.
    pub rates: BTreeMap<String, Decimal>,
}

impl PensionFunds {
    /// Looks up a provider's rate, falling back to the default provider.
    ///
    /// Returns the name of the provider whose rate was used along with the rate.
    pub fn rate_for(&self, provider: &str) -> EngineResult<(&str, Decimal)> {
        if let Some((name, rate)) = self.rates.get_key_value(provider) {
            return Ok((name.as_str(), *rate));
        }

        self.rates
            .get_key_value(&self.default_provider)
            .map(|(name, rate)| (name.as_str(), *rate))
            .ok_or_else(|| {
                EngineError::invalid_config(
                    "pension_funds.default_provider",
                    format!("no rate configured for '{}'", self.default_provider),
                )
            })
    }
}

/// The complete economic configuration snapshot consumed by both engines.
///
/// Engines only ever borrow this value. A refreshed configuration is built
/// with [`EconomicConfig::with_indicators`] and replaces the old snapshot
/// wholesale. Deserializing goes through [`EconomicConfig::new`], so the
/// bracket order holds however the input is ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EconomicConfigFields")]
pub struct EconomicConfig {
    indicators: Indicators,
    caps: LegalCaps,
    rates: ContributionRates,
    vacation: VacationFactors,
    tax_brackets: Vec<TaxBracket>,
    pension_funds: PensionFunds,
    holidays: HolidayCalendar,
}

#[derive(Deserialize)]
struct EconomicConfigFields {
    indicators: Indicators,
    caps: LegalCaps,
    rates: ContributionRates,
    vacation: VacationFactors,
    tax_brackets: Vec<TaxBracket>,
    pension_funds: PensionFunds,
    holidays: HolidayCalendar,
}

impl From<EconomicConfigFields> for EconomicConfig {
    fn from(fields: EconomicConfigFields) -> Self {
        EconomicConfig::new(
            fields.indicators,
            fields.caps,
            fields.rates,
            fields.vacation,
            fields.tax_brackets,
            fields.pension_funds,
            fields.holidays,
        )
    }
}

impl EconomicConfig {
    /// Creates a new EconomicConfig from its component parts.
    ///
    /// Tax brackets are sorted by upper limit, with the unbounded bracket last.
    pub fn new(
        indicators: Indicators,
        caps: LegalCaps,
        rates: ContributionRates,
        vacation: VacationFactors,
        tax_brackets: Vec<TaxBracket>,
        pension_funds: PensionFunds,
        holidays: HolidayCalendar,
    ) -> Self {
        let mut sorted_brackets = tax_brackets;
        sorted_brackets.sort_by(|a, b| match (a.upper_limit, b.upper_limit) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Self {
            indicators,
            caps,
            rates,
            vacation,
            tax_brackets: sorted_brackets,
            pension_funds,
            holidays,
        }
    }

    /// Returns the economic indicators.
    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    /// Returns the UF value.
    pub fn uf(&self) -> Decimal {
        self.indicators.uf
    }

    /// Returns the UTM value.
    pub fn utm(&self) -> Decimal {
        self.indicators.utm
    }

    /// Returns the IMM value.
    pub fn imm(&self) -> Decimal {
        self.indicators.imm
    }

    /// Returns the legal caps.
    pub fn caps(&self) -> &LegalCaps {
        &self.caps
    }

    /// Returns the contribution rates.
    pub fn rates(&self) -> &ContributionRates {
        &self.rates
    }

    /// Returns the vacation accrual factors.
    pub fn vacation(&self) -> &VacationFactors {
        &self.vacation
    }

    /// Returns the tax brackets in ascending order.
    pub fn tax_brackets(&self) -> &[TaxBracket] {
        &self.tax_brackets
    }

    /// Returns the pension fund rates.
    pub fn pension_funds(&self) -> &PensionFunds {
        &self.pension_funds
    }

    /// Returns the holiday calendar.
    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Returns a copy of this configuration with new indicator values.
    ///
    /// `imm` is only replaced when a value is given.
    pub fn with_indicators(
        &self,
        uf: Decimal,
        utm: Decimal,
        imm: Option<Decimal>,
        effective_date: NaiveDate,
    ) -> Self {
        let mut next = self.clone();
        next.indicators = Indicators {
            uf,
            utm,
            imm: imm.unwrap_or(self.indicators.imm),
            effective_date,
        };
        next
    }

    /// Returns a copy of this configuration with a different holiday calendar.
    pub fn with_holidays(&self, holidays: HolidayCalendar) -> Self {
        let mut next = self.clone();
        next.holidays = holidays;
        next
    }

    /// Validates the critical indicators and the tax bracket table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if UF, UTM or IMM is not
    /// positive, if the bracket table is empty or not strictly ascending, or
    /// if it does not end with exactly one unbounded bracket.
    pub fn validate(&self) -> EngineResult<()> {
        let indicators = [
            ("uf", self.indicators.uf),
            ("utm", self.indicators.utm),
            ("imm", self.indicators.imm),
        ];
        for (field, value) in indicators {
            if value <= Decimal::ZERO {
                return Err(EngineError::invalid_config(
                    field,
                    format!("must be greater than zero (got {})", value),
                ));
            }
        }

        if self.tax_brackets.is_empty() {
            return Err(EngineError::invalid_config(
                "tax_brackets",
                "at least one bracket is required",
            ));
        }

        let unbounded = self
            .tax_brackets
            .iter()
            .filter(|b| b.upper_limit.is_none())
            .count();
        if unbounded != 1 {
            return Err(EngineError::invalid_config(
                "tax_brackets",
                format!("expected exactly one unbounded bracket, found {}", unbounded),
            ));
        }

        let mut previous: Option<Decimal> = None;
        for bracket in &self.tax_brackets {
            if let Some(limit) = bracket.upper_limit {
                if previous.is_some_and(|p| limit <= p) {
                    return Err(EngineError::invalid_config(
                        "tax_brackets",
                        format!("upper limits must be strictly ascending ({})", limit),
                    ));
                }
                previous = Some(limit);
            }
            if bracket.rate < Decimal::ZERO || bracket.rebate < Decimal::ZERO {
                return Err(EngineError::invalid_config(
                    "tax_brackets",
                    "rates and rebates cannot be negative",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(EconomicConfig::default().validate().is_ok());
    }

    #[test]
    fn test_brackets_sorted_with_unbounded_last() {
        let base = EconomicConfig::default();
        let mut brackets = base.tax_brackets().to_vec();
        brackets.reverse();

        let config = EconomicConfig::new(
            base.indicators().clone(),
            base.caps().clone(),
            base.rates().clone(),
            base.vacation().clone(),
            brackets,
            base.pension_funds().clone(),
            base.holidays().clone(),
        );

        assert_eq!(config.tax_brackets(), base.tax_brackets());
        assert!(config.tax_brackets().last().unwrap().upper_limit.is_none());
    }

    #[test]
    fn test_deserialized_brackets_are_sorted() {
        let base = EconomicConfig::default();
        let mut value = serde_json::to_value(&base).unwrap();
        let brackets = value["tax_brackets"].as_array_mut().unwrap();
        brackets.reverse();
        assert!(brackets[0]["upper_limit"].is_null());

        let config: EconomicConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config, base);
        assert!(config.validate().is_ok());
        assert!(config.tax_brackets().last().unwrap().upper_limit.is_none());
    }

    #[test]
    fn test_zero_uf_is_rejected() {
        let config = EconomicConfig::default().with_indicators(
            Decimal::ZERO,
            dec("69611"),
            None,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        );

        match config.validate() {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "uf"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_imm_is_rejected() {
        let config = EconomicConfig::default().with_indicators(
            dec("39682.99"),
            dec("69611"),
            Some(dec("-1")),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        );

        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig { field, .. }) if field == "imm"
        ));
    }

    #[test]
    fn test_empty_brackets_are_rejected() {
        let base = EconomicConfig::default();
        let config = EconomicConfig::new(
            base.indicators().clone(),
            base.caps().clone(),
            base.rates().clone(),
            base.vacation().clone(),
            vec![],
            base.pension_funds().clone(),
            base.holidays().clone(),
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_brackets_without_unbounded_are_rejected() {
        let base = EconomicConfig::default();
        let brackets = vec![TaxBracket {
            upper_limit: Some(dec("1000000")),
            rate: Decimal::ZERO,
            rebate: Decimal::ZERO,
        }];
        let config = EconomicConfig::new(
            base.indicators().clone(),
            base.caps().clone(),
            base.rates().clone(),
            base.vacation().clone(),
            brackets,
            base.pension_funds().clone(),
            base.holidays().clone(),
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_limits_are_rejected() {
        let base = EconomicConfig::default();
        let bracket = |limit: Option<&str>| TaxBracket {
            upper_limit: limit.map(dec),
            rate: Decimal::ZERO,
            rebate: Decimal::ZERO,
        };
        let config = EconomicConfig::new(
            base.indicators().clone(),
            base.caps().clone(),
            base.rates().clone(),
            base.vacation().clone(),
            vec![bracket(Some("100")), bracket(Some("100")), bracket(None)],
            base.pension_funds().clone(),
            base.holidays().clone(),
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pension_rate_lookup() {
        let config = EconomicConfig::default();
        let (name, rate) = config.pension_funds().rate_for("Habitat").unwrap();
        assert_eq!(name, "Habitat");
        assert_eq!(rate, dec("0.1127"));
    }

    #[test]
    fn test_unknown_pension_provider_falls_back_to_default() {
        let config = EconomicConfig::default();
        let (name, rate) = config.pension_funds().rate_for("Inexistente").unwrap();
        assert_eq!(name, "Modelo");
        assert_eq!(rate, dec("0.1058"));
    }

    #[test]
    fn test_with_indicators_keeps_imm_when_absent() {
        let base = EconomicConfig::default();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let next = base.with_indicators(dec("39700"), dec("69700"), None, date);

        assert_eq!(next.uf(), dec("39700"));
        assert_eq!(next.utm(), dec("69700"));
        assert_eq!(next.imm(), base.imm());
        assert_eq!(next.indicators().effective_date, date);
        assert_eq!(next.tax_brackets(), base.tax_brackets());
    }
}
