//! The indicator source abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// Indicator values published by a provider for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Unidad de Fomento.
    pub uf: Decimal,
    /// Unidad Tributaria Mensual.
    pub utm: Decimal,
    /// The date the values apply to.
    pub effective_date: NaiveDate,
}

impl IndicatorSnapshot {
    /// Checks that both values are positive.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::InvalidValue`] naming the first bad indicator.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        ensure_positive("uf", self.uf)?;
        ensure_positive("utm", self.utm)
    }
}

pub(crate) fn ensure_positive(indicator: &str, value: Decimal) -> Result<(), IndicatorError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(IndicatorError::InvalidValue {
            indicator: indicator.to_string(),
            value: value.to_string(),
        })
    }
}

/// A provider of current economic indicators.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Short name used in logs and responses.
    fn name(&self) -> &str;

    /// Fetches the current UF and UTM values.
    async fn fetch(&self) -> Result<IndicatorSnapshot, IndicatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(uf: i64, utm: i64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            uf: Decimal::from(uf),
            utm: Decimal::from(utm),
            effective_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        }
    }

    #[test]
    fn test_positive_values_are_valid() {
        assert!(snapshot(39683, 69611).validate().is_ok());
    }

    #[test]
    fn test_zero_uf_is_invalid() {
        let error = snapshot(0, 69611).validate().unwrap_err();
        assert!(matches!(
            error,
            IndicatorError::InvalidValue { ref indicator, .. } if indicator == "uf"
        ));
    }

    #[test]
    fn test_negative_utm_is_invalid() {
        assert!(snapshot(39683, -1).validate().is_err());
    }
}
