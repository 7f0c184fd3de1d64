//! Mandatory social-security contributions: pension (DL 3.500), health
//! (Ley 18.469) and unemployment insurance (Ley 19.728).

use rust_decimal::Decimal;

use crate::config::EconomicConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, ContractType, ContributionBases, Contributions, HealthSystem};

use super::money::round_clp;

/// The result of the contribution calculation, including its audit steps.
#[derive(Debug, Clone)]
pub struct ContributionsResult {
    /// Capped bases the contributions were charged on.
    pub bases: ContributionBases,
    /// The contributions.
    pub contributions: Contributions,
    /// One audit step per step: bases, pension, health, unemployment.
    pub audit_steps: Vec<AuditStep>,
}

/// What the worker's contributions depend on.
#[derive(Debug, Clone, Copy)]
pub struct ContributionParams<'a> {
    /// Gross taxable total.
    pub total_taxable: Decimal,
    /// Gross taxable total less pre-tax contributions.
    pub tax_reduced_base: Decimal,
    /// Whether pension and health are charged on the reduced base.
    pub reduce_contribution_base: bool,
    /// AFP name.
    pub pension_fund: &'a str,
    /// Health system.
    pub health_system: HealthSystem,
    /// Private plan price in UF.
    pub health_plan_uf: Decimal,
    /// Contract type.
    pub contract_type: ContractType,
}

/// Computes the capped bases and the pension, health and unemployment
/// contributions charged on them.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidConfig`] if neither the named
/// pension fund nor the default provider has a configured rate.
pub fn calculate_contributions(
    params: ContributionParams<'_>,
    config: &EconomicConfig,
    first_step: u32,
) -> EngineResult<ContributionsResult> {
    let uf = config.uf();
    let caps = config.caps();
    let rates = config.rates();
    let mut step_number = first_step;
    let mut audit_steps = Vec::with_capacity(4);

    let pension_health_cap = round_clp(uf * caps.pension_health_uf);
    let unemployment_cap = round_clp(uf * caps.unemployment_uf);
    let contribution_source = if params.reduce_contribution_base {
        params.tax_reduced_base
    } else {
        params.total_taxable
    };
    let pension_health_base = contribution_source.min(pension_health_cap);
    let unemployment_base = params.total_taxable.min(unemployment_cap);

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "contribution_bases".to_string(),
        rule_name: "Contribution Caps".to_string(),
        clause_ref: "DL 3.500, Art. 16".to_string(),
        input: serde_json::json!({
            "total_taxable": params.total_taxable.normalize().to_string(),
            "tax_reduced_base": params.tax_reduced_base.normalize().to_string(),
            "reduce_contribution_base": params.reduce_contribution_base,
            "uf": uf.normalize().to_string(),
        }),
        output: serde_json::json!({
            "pension_health_cap": pension_health_cap.normalize().to_string(),
            "unemployment_cap": unemployment_cap.normalize().to_string(),
            "pension_health_base": pension_health_base.normalize().to_string(),
            "unemployment_base": unemployment_base.normalize().to_string(),
        }),
        reasoning: format!(
            "Pension/health base min(${}, {} UF = ${}) = ${}; unemployment base min(${}, {} UF = ${}) = ${}",
            contribution_source.normalize(),
            caps.pension_health_uf.normalize(),
            pension_health_cap.normalize(),
            pension_health_base.normalize(),
            params.total_taxable.normalize(),
            caps.unemployment_uf.normalize(),
            unemployment_cap.normalize(),
            unemployment_base.normalize()
        ),
    });
    step_number += 1;

    let (pension_fund, pension_rate) = config.pension_funds().rate_for(params.pension_fund)?;
    let pension = round_clp(pension_health_base * pension_rate);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "pension_contribution".to_string(),
        rule_name: "Pension Contribution".to_string(),
        clause_ref: "DL 3.500, Art. 17".to_string(),
        input: serde_json::json!({
            "requested_fund": params.pension_fund,
            "base": pension_health_base.normalize().to_string(),
        }),
        output: serde_json::json!({
            "fund": pension_fund,
            "rate": pension_rate.normalize().to_string(),
            "amount": pension.normalize().to_string(),
        }),
        reasoning: format!(
            "${} × {} ({}) = ${}",
            pension_health_base.normalize(),
            pension_rate.normalize(),
            pension_fund,
            pension.normalize()
        ),
    });
    step_number += 1;

    let health_legal = round_clp(pension_health_base * rates.health);
    let (health, health_reasoning) = match params.health_system {
        HealthSystem::Public => (
            health_legal,
            format!(
                "Legal {}% of ${} = ${}",
                (rates.health * Decimal::ONE_HUNDRED).normalize(),
                pension_health_base.normalize(),
                health_legal.normalize()
            ),
        ),
        HealthSystem::Private => {
            let plan_cost = round_clp(params.health_plan_uf * uf);
            (
                health_legal.max(plan_cost),
                format!(
                    "max(legal ${}, plan {} UF = ${})",
                    health_legal.normalize(),
                    params.health_plan_uf.normalize(),
                    plan_cost.normalize()
                ),
            )
        }
    };
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "health_contribution".to_string(),
        rule_name: "Health Contribution".to_string(),
        clause_ref: "Ley 18.469, Art. 84".to_string(),
        input: serde_json::json!({
            "health_system": params.health_system,
            "base": pension_health_base.normalize().to_string(),
            "plan_uf": params.health_plan_uf.normalize().to_string(),
        }),
        output: serde_json::json!({
            "legal": health_legal.normalize().to_string(),
            "amount": health.normalize().to_string(),
        }),
        reasoning: health_reasoning,
    });
    step_number += 1;

    let unemployment_rate = match params.contract_type {
        ContractType::Indefinite => rates.unemployment_indefinite_worker,
        ContractType::FixedTerm => rates.unemployment_fixed_term_worker,
    };
    let unemployment_insurance = round_clp(unemployment_base * unemployment_rate);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "unemployment_insurance".to_string(),
        rule_name: "Unemployment Insurance".to_string(),
        clause_ref: "Ley 19.728, Art. 5".to_string(),
        input: serde_json::json!({
            "contract_type": params.contract_type,
            "base": unemployment_base.normalize().to_string(),
        }),
        output: serde_json::json!({
            "rate": unemployment_rate.normalize().to_string(),
            "amount": unemployment_insurance.normalize().to_string(),
        }),
        reasoning: format!(
            "${} × {} = ${}",
            unemployment_base.normalize(),
            unemployment_rate.normalize(),
            unemployment_insurance.normalize()
        ),
    });

    Ok(ContributionsResult {
        bases: ContributionBases {
            pension_health_cap,
            unemployment_cap,
            pension_health_base,
            unemployment_base,
        },
        contributions: Contributions {
            pension_fund: pension_fund.to_string(),
            pension_rate,
            pension,
            health_legal,
            health,
            unemployment_insurance,
        },
        audit_steps,
    })
}
