//! Peso rounding and formatting.
//!
//! Every line item of a settlement or payslip is an integral amount of pesos,
//! rounded where it is produced.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// The commercial month used to prorate monthly amounts.
pub const COMMERCIAL_MONTH_DAYS: u32 = 30;

/// Largest peso amount accepted as input: 10^15.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Largest quantity (hours, days, UF) accepted as input: 10^6.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Rejects an input whose magnitude exceeds `limit`.
///
/// Bounded inputs keep every intermediate product far from the range of
/// [`Decimal`].
pub(crate) fn ensure_within(field: &str, value: Decimal, limit: Decimal) -> EngineResult<()> {
    if value.abs() > limit {
        return Err(EngineError::invalid_input(
            field,
            format!("{} exceeds the limit of {}", value, limit),
        ));
    }
    Ok(())
}

/// Rounds an amount to whole pesos, halves away from zero.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::round_clp;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_clp(Decimal::new(2005, 1)), Decimal::new(201, 0));
/// assert_eq!(round_clp(Decimal::new(2004, 1)), Decimal::new(200, 0));
/// ```
pub fn round_clp(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates an amount to whole pesos, never rounding up.
///
/// Used for legal ceilings, which a rounded value must not exceed.
///
/// ```
/// use chile_labor_engine::calculation::floor_clp;
/// use rust_decimal::Decimal;
///
/// assert_eq!(floor_clp(Decimal::new(35713845, 1)), Decimal::new(3571384, 0));
/// ```
pub fn floor_clp(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::ToZero)
}

/// Formats an amount as Chilean pesos, e.g. `$1.234.567`.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::format_clp;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_clp(Decimal::new(1234567, 0)), "$1.234.567");
/// assert_eq!(format_clp(Decimal::new(-5000, 0)), "-$5.000");
/// ```
pub fn format_clp(amount: Decimal) -> String {
    let rounded = round_clp(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
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
    fn test_round_half_up() {
        assert_eq!(round_clp(dec("0.5")), dec("1"));
        assert_eq!(round_clp(dec("1234.49")), dec("1234"));
        assert_eq!(round_clp(dec("1234.5")), dec("1235"));
    }

    #[test]
    fn test_round_preserves_integers() {
        assert_eq!(round_clp(dec("800000")), dec("800000"));
    }

    #[test]
    fn test_limits() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000000"));
        assert_eq!(MAX_QUANTITY, dec("1000000"));
        assert!(ensure_within("base_salary", MAX_AMOUNT, MAX_AMOUNT).is_ok());
        assert!(ensure_within("base_salary", MAX_AMOUNT + Decimal::ONE, MAX_AMOUNT).is_err());
        assert!(ensure_within("overtime_hours", dec("-1000001"), MAX_QUANTITY).is_err());
    }

    #[test]
    fn test_floor_never_rounds_up() {
        assert_eq!(floor_clp(dec("3571384.5")), dec("3571384"));
        assert_eq!(floor_clp(dec("3571469.99")), dec("3571469"));
        assert_eq!(floor_clp(dec("3600000")), dec("3600000"));
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_clp(dec("0")), "$0");
        assert_eq!(format_clp(dec("999")), "$999");
        assert_eq!(format_clp(dec("1000")), "$1.000");
    }

    #[test]
    fn test_format_rounds_before_grouping() {
        assert_eq!(format_clp(dec("3571469.1")), "$3.571.469");
        assert_eq!(format_clp(dec("999999.5")), "$1.000.000");
    }
}
