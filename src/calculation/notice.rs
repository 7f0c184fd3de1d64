//! Indemnity in lieu of notice (Art. 161, 162).

use rust_decimal::Decimal;

use crate::models::{AuditStep, IndemnityResult, TerminationCause};

use super::years_of_service::{REASON_CAUSE_NOT_APPLICABLE, REASON_DISABLED};

/// Reason given when 30 days' notice was given.
pub const REASON_NOTICE_GIVEN: &str = "Notice was given at least 30 days in advance";

/// The result of the notice indemnity calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct NoticeResult {
    /// The indemnity.
    pub indemnity: IndemnityResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the indemnity in lieu of notice: one capped monthly salary
/// for an Art. 161 dismissal without 30 days' notice.
pub fn calculate_notice(
    cause: TerminationCause,
    enabled: bool,
    notice_given: bool,
    capped_salary: Decimal,
    step_number: u32,
) -> NoticeResult {
    let indemnity = if !enabled {
        IndemnityResult::not_applied(REASON_DISABLED)
    } else if !cause.is_without_cause() {
        IndemnityResult::not_applied(REASON_CAUSE_NOT_APPLICABLE)
    } else if notice_given {
        IndemnityResult::not_applied(REASON_NOTICE_GIVEN)
    } else {
        IndemnityResult {
            amount: capped_salary,
            applied: true,
            reason: "No prior notice: one capped monthly salary".to_string(),
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "notice_indemnity".to_string(),
        rule_name: "Indemnity in Lieu of Notice".to_string(),
        clause_ref: "Art. 161, 162".to_string(),
        input: serde_json::json!({
            "cause": cause,
            "enabled": enabled,
            "notice_given": notice_given,
            "capped_salary": capped_salary.normalize().to_string(),
        }),
        output: serde_json::json!({
            "amount": indemnity.amount.normalize().to_string(),
            "applied": indemnity.applied,
        }),
        reasoning: indemnity.reason.clone(),
    };

    NoticeResult {
        indemnity,
        audit_step,
    }
}
