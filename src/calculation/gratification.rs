//! Overtime pay (Art. 32) and monthly gratification (Art. 50).

use rust_decimal::Decimal;

use crate::models::{AuditStep, GratificationMode};

use super::money::{format_clp, round_clp};

/// Share of the month's remuneration paid as statutory gratification.
pub const GRATIFICATION_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Months the annual gratification cap is spread over.
const MONTHS_PER_YEAR: u32 = 12;

/// The result of the overtime calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct OvertimeResult {
    /// Overtime pay in pesos.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of the gratification calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct GratificationResult {
    /// Gratification paid this month.
    pub amount: Decimal,
    /// Monthly cap, for statutory gratification.
    pub monthly_cap: Option<Decimal>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates overtime pay as `round(base_salary × hourly_factor × hours)`.
///
/// The hourly factor already carries the 50% surcharge for the weekly hours
/// of the contract.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::calculate_overtime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_overtime(
///     Decimal::new(800_000, 0),
///     Decimal::from_str("0.0089286").unwrap(),
///     Decimal::new(10, 0),
///     1,
/// );
/// assert_eq!(result.amount, Decimal::new(71_429, 0));
/// ```
pub fn calculate_overtime(
    base_salary: Decimal,
    hourly_factor: Decimal,
    hours: Decimal,
    step_number: u32,
) -> OvertimeResult {
    let amount = round_clp(base_salary * hourly_factor * hours);

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime".to_string(),
        rule_name: "Overtime Pay".to_string(),
        clause_ref: "Art. 32".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "hourly_factor": hourly_factor.normalize().to_string(),
            "hours": hours.normalize().to_string(),
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string(),
        }),
        reasoning: format!(
            "${} × {} × {}h = ${}",
            base_salary.normalize(),
            hourly_factor.normalize(),
            hours.normalize(),
            amount.normalize()
        ),
    };

    OvertimeResult { amount, audit_step }
}

/// Calculates the monthly gratification.
///
/// In manual mode the given amount is paid as is. In statutory mode it is 25%
/// of base, overtime and bonus, capped at `cap_imm × imm / 12`, each side
/// rounded to whole pesos before comparing.
pub fn calculate_gratification(
    mode: GratificationMode,
    manual_amount: Decimal,
    remuneration: Decimal,
    imm: Decimal,
    cap_imm: Decimal,
    step_number: u32,
) -> GratificationResult {
    let (amount, monthly_cap, reasoning) = match mode {
        GratificationMode::Manual => (
            manual_amount,
            None,
            format!("Manual gratification {}", format_clp(manual_amount)),
        ),
        GratificationMode::Statutory => {
            let monthly_cap = round_clp(cap_imm * imm / Decimal::from(MONTHS_PER_YEAR));
            let theoretical = round_clp(remuneration * GRATIFICATION_RATE);
            let amount = theoretical.min(monthly_cap);
            let reasoning = if theoretical > monthly_cap {
                format!(
                    "25% of {} = {}, capped at {} IMM / 12 = {}",
                    format_clp(remuneration),
                    format_clp(theoretical),
                    cap_imm.normalize(),
                    format_clp(monthly_cap)
                )
            } else {
                format!(
                    "25% of {} = {} (cap {})",
                    format_clp(remuneration),
                    format_clp(theoretical),
                    format_clp(monthly_cap)
                )
            };
            (amount, Some(monthly_cap), reasoning)
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "gratification".to_string(),
        rule_name: "Monthly Gratification".to_string(),
        clause_ref: "Art. 50".to_string(),
        input: serde_json::json!({
            "mode": mode,
            "manual_amount": manual_amount.normalize().to_string(),
            "remuneration": remuneration.normalize().to_string(),
            "imm": imm.normalize().to_string(),
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string(),
            "monthly_cap": monthly_cap.map(|cap| cap.normalize().to_string()),
        }),
        reasoning,
    };

    GratificationResult {
        amount,
        monthly_cap,
        audit_step,
    }
}
