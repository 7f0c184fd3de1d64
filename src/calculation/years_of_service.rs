//! Indemnity for years of service (Art. 163).

use rust_decimal::Decimal;

use crate::models::{AuditStep, IndemnityResult, TerminationCause};

use super::money::{format_clp, round_clp};

/// Reason given when the user switched an indemnity off.
pub const REASON_DISABLED: &str = "Disabled by user";

/// Reason given when the termination cause does not entitle to an indemnity.
pub const REASON_CAUSE_NOT_APPLICABLE: &str = "Only applies to Art. 161 (business needs)";

/// The result of the years-of-service calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct YearsOfServiceResult {
    /// The indemnity.
    pub indemnity: IndemnityResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the years-of-service indemnity.
///
/// One capped monthly salary per capped indemnity year, payable only on an
/// Art. 161 dismissal. The enabled toggle is checked before the cause.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::calculate_years_of_service;
/// use chile_labor_engine::models::TerminationCause;
/// use rust_decimal::Decimal;
///
/// let result = calculate_years_of_service(
///     TerminationCause::Article161,
///     true,
///     5,
///     Decimal::new(1_300_000, 0),
///     3,
/// );
/// assert_eq!(result.indemnity.amount, Decimal::new(6_500_000, 0));
/// assert!(result.indemnity.applied);
/// ```
pub fn calculate_years_of_service(
    cause: TerminationCause,
    enabled: bool,
    capped_years: u32,
    capped_salary: Decimal,
    step_number: u32,
) -> YearsOfServiceResult {
    let indemnity = if !enabled {
        IndemnityResult::not_applied(REASON_DISABLED)
    } else if !cause.is_without_cause() {
        IndemnityResult::not_applied(REASON_CAUSE_NOT_APPLICABLE)
    } else {
        IndemnityResult {
            amount: round_clp(Decimal::from(capped_years) * capped_salary),
            applied: true,
            reason: format!("{} years × {}", capped_years, format_clp(capped_salary)),
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "years_of_service_indemnity".to_string(),
        rule_name: "Years of Service Indemnity".to_string(),
        clause_ref: "Art. 163".to_string(),
        input: serde_json::json!({
            "cause": cause,
            "enabled": enabled,
            "capped_years": capped_years,
            "capped_salary": capped_salary.normalize().to_string(),
        }),
        output: serde_json::json!({
            "amount": indemnity.amount.normalize().to_string(),
            "applied": indemnity.applied,
        }),
        reasoning: indemnity.reason.clone(),
    };

    YearsOfServiceResult {
        indemnity,
        audit_step,
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
    fn test_applies_for_161() {
        let result =
            calculate_years_of_service(TerminationCause::Article161, true, 11, dec("3571469"), 1);
        assert_eq!(result.indemnity.amount, dec("39286159"));
        assert!(result.indemnity.applied);
        assert_eq!(result.indemnity.reason, "11 years × $3.571.469");
    }

    #[test]
    fn test_other_causes_get_nothing() {
        for cause in [
            TerminationCause::Article159,
            TerminationCause::Article160,
            TerminationCause::Other(163),
        ] {
            let result = calculate_years_of_service(cause, true, 5, dec("1000000"), 1);
            assert_eq!(result.indemnity.amount, Decimal::ZERO);
            assert!(!result.indemnity.applied);
            assert_eq!(result.indemnity.reason, REASON_CAUSE_NOT_APPLICABLE);
        }
    }

    #[test]
    fn test_disabled_reason_wins_over_cause() {
        let result =
            calculate_years_of_service(TerminationCause::Article160, false, 5, dec("1000000"), 1);
        assert_eq!(result.indemnity.reason, REASON_DISABLED);
        assert_eq!(result.audit_step.reasoning, REASON_DISABLED);
    }

    #[test]
    fn test_zero_years_applies_with_zero_amount() {
        let result =
            calculate_years_of_service(TerminationCause::Article161, true, 0, dec("1000000"), 1);
        assert!(result.indemnity.applied);
        assert_eq!(result.indemnity.amount, Decimal::ZERO);
    }
}
