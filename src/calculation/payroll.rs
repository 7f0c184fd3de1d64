//! The payroll (sueldo líquido) engine.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EconomicConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, GrossBreakdown, PayrollEconomics, PayrollInput, PayrollResult, VoluntaryDeductions,
};

use super::contributions::{ContributionParams, calculate_contributions};
use super::gratification::{calculate_gratification, calculate_overtime};
use super::income_tax::calculate_income_tax;
use super::money::{MAX_AMOUNT, MAX_QUANTITY, ensure_within};

fn validate_input(input: &PayrollInput) -> EngineResult<()> {
    let amounts = [
        ("base_salary", input.base_salary),
        ("gratification_amount", input.gratification_amount),
        ("bonus", input.bonus),
        ("meal_allowance", input.meal_allowance),
        ("transport_allowance", input.transport_allowance),
        ("travel_allowance", input.travel_allowance),
        ("ccaf_savings", input.ccaf_savings),
        ("voluntary_pension_savings", input.voluntary_pension_savings),
        ("union_dues", input.union_dues),
        ("loan_repayment", input.loan_repayment),
        ("court_ordered_pension", input.court_ordered_pension),
        ("other_deductions", input.other_deductions),
    ];
    for (field, value) in amounts {
        ensure_within(field, value, MAX_AMOUNT)?;
    }
    ensure_within("overtime_hours", input.overtime_hours, MAX_QUANTITY)?;
    ensure_within("health_plan_uf", input.health_plan_uf, MAX_QUANTITY)
}

/// Calculates a monthly payslip from gross pay down to take-home pay.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidConfig`] if the configuration
/// fails [`EconomicConfig::validate`] or has no rate for the default pension
/// fund, and [`crate::error::EngineError::InvalidInput`] if an amount exceeds
/// [`MAX_AMOUNT`] or a quantity exceeds [`MAX_QUANTITY`].
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::calculate_payroll;
/// use chile_labor_engine::config::EconomicConfig;
/// use chile_labor_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let input: PayrollInput = serde_json::from_str(r#"{"base_salary": "800000"}"#).unwrap();
/// let result = calculate_payroll(&input, &EconomicConfig::default()).unwrap();
///
/// assert_eq!(result.gross.gratification, Decimal::new(200_000, 0));
/// assert_eq!(result.gross.total_taxable, Decimal::new(1_000_000, 0));
/// ```
pub fn calculate_payroll(
    input: &PayrollInput,
    config: &EconomicConfig,
) -> EngineResult<PayrollResult> {
    config.validate()?;
    validate_input(input)?;

    let mut audit_trace: Vec<AuditStep> = Vec::with_capacity(9);
    let mut step_number: u32 = 1;

    let overtime = calculate_overtime(
        input.base_salary,
        config.rates().overtime_hourly_factor,
        input.overtime_hours,
        step_number,
    );
    audit_trace.push(overtime.audit_step);
    step_number += 1;

    let gratification = calculate_gratification(
        input.gratification_mode,
        input.gratification_amount,
        input.base_salary + overtime.amount + input.bonus,
        config.imm(),
        config.caps().gratification_imm,
        step_number,
    );
    audit_trace.push(gratification.audit_step);
    step_number += 1;

    let total_taxable = input.base_salary + gratification.amount + overtime.amount + input.bonus;
    let gross = GrossBreakdown {
        base_salary: input.base_salary,
        gratification: gratification.amount,
        overtime: overtime.amount,
        bonus: input.bonus,
        total_taxable,
    };

    let deductions = VoluntaryDeductions {
        ccaf_savings: input.ccaf_savings,
        voluntary_pension_savings: input.voluntary_pension_savings,
        union_dues: input.union_dues,
        loan_repayment: input.loan_repayment,
        court_ordered_pension: input.court_ordered_pension,
        other_deductions: input.other_deductions,
    };
    let tax_reduced_base = total_taxable - deductions.pre_tax();

    let contributions = calculate_contributions(
        ContributionParams {
            total_taxable,
            tax_reduced_base,
            reduce_contribution_base: input.reduce_contribution_base,
            pension_fund: &input.pension_fund,
            health_system: input.health_system,
            health_plan_uf: input.health_plan_uf,
            contract_type: input.contract_type,
        },
        config,
        step_number,
    )?;
    step_number += contributions.audit_steps.len() as u32;
    audit_trace.extend(contributions.audit_steps);
    let bases = contributions.bases;
    let contributions = contributions.contributions;

    let tax_base = (tax_reduced_base - contributions.total()).max(Decimal::ZERO);
    let income_tax = calculate_income_tax(tax_base, config.tax_brackets(), step_number)?;
    audit_trace.push(income_tax.audit_step);

    let non_taxable_total =
        input.meal_allowance + input.transport_allowance + input.travel_allowance;

    let net_pay = total_taxable - deductions.pre_tax() - contributions.total() - income_tax.tax
        + non_taxable_total
        - deductions.post_tax();

    debug!(
        total_taxable = %total_taxable,
        tax = %income_tax.tax,
        net_pay = %net_pay,
        "Payroll calculated"
    );

    Ok(PayrollResult {
        economics: PayrollEconomics {
            uf: config.uf(),
            utm: config.utm(),
            imm: config.imm(),
        },
        gross,
        tax_reduced_base,
        bases,
        contributions,
        tax_base,
        tax: income_tax.tax,
        non_taxable_total,
        deductions,
        net_pay,
        audit_trace,
    })
}
