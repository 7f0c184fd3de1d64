//! Estimate of the unemployment-insurance contribution deductible from the
//! years-of-service indemnity (Ley 19.728, Art. 13).

use rust_decimal::Decimal;

use crate::models::{AuditStep, ServiceTime, TerminationCause, UnemploymentEstimate};

use super::money::round_clp;

/// The result of the unemployment-insurance estimate, including the audit step.
#[derive(Debug, Clone)]
pub struct UnemploymentEstimateResult {
    /// The estimate, when simulated and applicable.
    pub estimate: Option<UnemploymentEstimate>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Estimates the employer's accumulated contribution to the worker's
/// unemployment account as `capped_salary × rate × months of service`.
///
/// Only simulated for Art. 161 dismissals.
pub fn estimate_unemployment_contribution(
    cause: TerminationCause,
    simulate: bool,
    service_time: &ServiceTime,
    capped_salary: Decimal,
    rate: Decimal,
    step_number: u32,
) -> UnemploymentEstimateResult {
    let months = service_time.total_months();

    let estimate = if simulate && cause.is_without_cause() {
        let amount = round_clp(capped_salary * rate * Decimal::from(months));
        Some(UnemploymentEstimate {
            amount,
            rate,
            months,
            reason: format!(
                "${} × {}% × {} months",
                capped_salary.normalize(),
                (rate * Decimal::ONE_HUNDRED).normalize(),
                months
            ),
        })
    } else {
        None
    };

    let reasoning = match &estimate {
        Some(estimate) => format!("Estimated contribution: {}", estimate.reason),
        None if !simulate => "Simulation disabled".to_string(),
        None => "Only applies to Art. 161 (business needs)".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "unemployment_estimate".to_string(),
        rule_name: "Unemployment Insurance Estimate".to_string(),
        clause_ref: "Ley 19.728, Art. 13".to_string(),
        input: serde_json::json!({
            "cause": cause,
            "simulate": simulate,
            "months": months,
            "capped_salary": capped_salary.normalize().to_string(),
            "rate": rate.normalize().to_string(),
        }),
        output: serde_json::json!({
            "applied": estimate.is_some(),
            "amount": estimate
                .as_ref()
                .map(|e| e.amount)
                .unwrap_or(Decimal::ZERO)
                .normalize()
                .to_string(),
        }),
        reasoning,
    };

    UnemploymentEstimateResult {
        estimate,
        audit_step,
    }
}
