//! Indemnity base and its 90 UF cap (Art. 172).

use rust_decimal::Decimal;

use crate::models::{AuditStep, SeveranceEconomics, SeveranceInput};

use super::money::{floor_clp, format_clp};

/// The result of building the indemnity base, including the audit step.
#[derive(Debug, Clone)]
pub struct SeveranceBaseResult {
    /// Salary components and capped base.
    pub economics: SeveranceEconomics,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Builds the indemnity base from the salary components and caps it.
///
/// The uncapped base is the sum of base salary, gratification and variable
/// average, plus assignments when `include_assignments_in_severance_base` is
/// set. The vacation base ("full salary") is built the same way with its own
/// toggle. The cap is `uf × severance_cap_uf`, truncated to whole pesos so the
/// capped base never exceeds the legal ceiling.
pub fn calculate_severance_base(
    input: &SeveranceInput,
    uf: Decimal,
    severance_cap_uf: Decimal,
    step_number: u32,
) -> SeveranceBaseResult {
    let fixed = input.base_salary + input.gratification + input.variable_average;

    let taxable_salary = if input.options.include_assignments_in_severance_base {
        fixed + input.assignments
    } else {
        fixed
    };
    let full_salary = if input.options.include_assignments_in_vacation_base {
        fixed + input.assignments
    } else {
        fixed
    };

    let salary_cap = floor_clp(uf * severance_cap_uf);
    let is_capped = taxable_salary > salary_cap;
    let capped_salary = taxable_salary.min(salary_cap);

    let reasoning = if is_capped {
        format!(
            "Base {} exceeds {} UF × ${} = {}; capped at {}",
            format_clp(taxable_salary),
            severance_cap_uf.normalize(),
            uf.normalize(),
            format_clp(salary_cap),
            format_clp(capped_salary)
        )
    } else {
        format!(
            "Base {} is within the {} UF cap ({})",
            format_clp(taxable_salary),
            severance_cap_uf.normalize(),
            format_clp(salary_cap)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "severance_base_cap".to_string(),
        rule_name: "Indemnity Base Cap".to_string(),
        clause_ref: "Art. 172".to_string(),
        input: serde_json::json!({
            "base_salary": input.base_salary.normalize().to_string(),
            "gratification": input.gratification.normalize().to_string(),
            "assignments": input.assignments.normalize().to_string(),
            "variable_average": input.variable_average.normalize().to_string(),
            "include_assignments": input.options.include_assignments_in_severance_base,
            "uf": uf.normalize().to_string(),
            "cap_uf": severance_cap_uf.normalize().to_string(),
        }),
        output: serde_json::json!({
            "taxable_salary": taxable_salary.normalize().to_string(),
            "salary_cap": salary_cap.normalize().to_string(),
            "capped_salary": capped_salary.normalize().to_string(),
            "is_capped": is_capped,
        }),
        reasoning,
    };

    let economics = SeveranceEconomics {
        base_salary: input.base_salary,
        gratification: input.gratification,
        assignments: input.assignments,
        variable_average: input.variable_average,
        taxable_salary,
        full_salary,
        salary_cap,
        capped_salary,
        is_capped,
        uf,
    };

    SeveranceBaseResult {
        economics,
        audit_step,
    }
}
