//! Second-category income tax ("impuesto único") (LIR Art. 43).

use rust_decimal::Decimal;

use crate::config::TaxBracket;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::money::round_clp;

/// The result of the income tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Tax in pesos.
    pub tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Finds the bracket a tax base falls in: the first whose upper limit is at
/// least the base.
pub fn find_bracket(brackets: &[TaxBracket], tax_base: Decimal) -> Option<(usize, &TaxBracket)> {
    brackets
        .iter()
        .enumerate()
        .find(|(_, bracket)| bracket.contains(tax_base))
}

/// Calculates the monthly income tax as `round(max(0, base × rate − rebate))`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] if no bracket contains the base,
/// which only happens when the table lacks an unbounded bracket.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::calculate_income_tax;
/// use chile_labor_engine::config::default_tax_brackets;
/// use rust_decimal::Decimal;
///
/// let brackets = default_tax_brackets();
/// let exempt = calculate_income_tax(Decimal::new(900_000, 0), &brackets, 1).unwrap();
/// assert_eq!(exempt.tax, Decimal::ZERO);
///
/// let taxed = calculate_income_tax(Decimal::new(1_000_000, 0), &brackets, 1).unwrap();
/// assert_eq!(taxed.tax, Decimal::new(2_410, 0));
/// ```
pub fn calculate_income_tax(
    tax_base: Decimal,
    brackets: &[TaxBracket],
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let (index, bracket) = find_bracket(brackets, tax_base).ok_or_else(|| {
        EngineError::invalid_config(
            "tax_brackets",
            format!("no bracket contains a tax base of {}", tax_base),
        )
    })?;

    let tax = round_clp((tax_base * bracket.rate - bracket.rebate).max(Decimal::ZERO));

    let limit = bracket
        .upper_limit
        .map(|limit| format!("${}", limit.normalize()))
        .unwrap_or_else(|| "unbounded".to_string());

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Second Category Income Tax".to_string(),
        clause_ref: "LIR Art. 43".to_string(),
        input: serde_json::json!({
            "tax_base": tax_base.normalize().to_string(),
        }),
        output: serde_json::json!({
            "bracket": index + 1,
            "upper_limit": bracket.upper_limit.map(|l| l.normalize().to_string()),
            "rate": bracket.rate.normalize().to_string(),
            "rebate": bracket.rebate.normalize().to_string(),
            "tax": tax.normalize().to_string(),
        }),
        reasoning: format!(
            "Bracket {} (up to {}): ${} × {} − ${} = ${}",
            index + 1,
            limit,
            tax_base.normalize(),
            bracket.rate.normalize(),
            bracket.rebate.normalize(),
            tax.normalize()
        ),
    };

    Ok(IncomeTaxResult { tax, audit_step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tax_brackets;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_upper_limit_is_inclusive() {
        let brackets = default_tax_brackets();
        let (index, _) = find_bracket(&brackets, dec("939748.50")).unwrap();
        assert_eq!(index, 0);
        let (index, _) = find_bracket(&brackets, dec("939748.51")).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_exempt_bracket() {
        let result = calculate_income_tax(dec("939748.50"), &default_tax_brackets(), 1).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
    }

    #[test]
    fn test_top_bracket() {
        let brackets = default_tax_brackets();
        let result = calculate_income_tax(dec("30000000"), &brackets, 9).unwrap();
        // 30000000 × 0.40 − 2702299.02 = 9297700.98
        assert_eq!(result.tax, dec("9297701"));
        assert!(result.audit_step.reasoning.contains("unbounded"));
        assert_eq!(result.audit_step.step_number, 9);
    }

    #[test]
    fn test_zero_base() {
        let result = calculate_income_tax(Decimal::ZERO, &default_tax_brackets(), 1).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
    }

    #[test]
    fn test_missing_unbounded_bracket_is_an_error() {
        let brackets = vec![TaxBracket {
            upper_limit: Some(dec("1000")),
            rate: Decimal::ZERO,
            rebate: Decimal::ZERO,
        }];
        let result = calculate_income_tax(dec("2000"), &brackets, 1);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    proptest! {
        #[test]
        fn prop_tax_is_monotonic(a in 0i64..40_000_000, delta in 0i64..5_000_000) {
            let brackets = default_tax_brackets();
            let low = calculate_income_tax(Decimal::from(a), &brackets, 1).unwrap().tax;
            let high = calculate_income_tax(Decimal::from(a + delta), &brackets, 1).unwrap().tax;
            prop_assert!(high >= low);
        }

        #[test]
        fn prop_tax_never_exceeds_base(base in 0i64..40_000_000) {
            let tax = calculate_income_tax(Decimal::from(base), &default_tax_brackets(), 1)
                .unwrap()
                .tax;
            prop_assert!(tax >= Decimal::ZERO);
            prop_assert!(tax <= Decimal::from(base));
        }
    }
}
