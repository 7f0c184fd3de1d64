//! Salary owed for the days worked in the final month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{AuditStep, PendingRemuneration, SeveranceEconomics};

use super::money::{COMMERCIAL_MONTH_DAYS, round_clp};

/// The result of the pending remuneration calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct PendingRemunerationResult {
    /// The prorated breakdown.
    pub remuneration: PendingRemuneration,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn prorate(monthly: Decimal, days_worked: u32) -> Decimal {
    round_clp(monthly * Decimal::from(days_worked) / Decimal::from(COMMERCIAL_MONTH_DAYS))
}

/// Prorates each salary component over the days worked in the last month.
///
/// Days worked is the day of month of `end_date`, at most 30. Each component
/// is rounded on its own and the total is their sum. Assignments are always
/// paid in full proportion, regardless of the base toggles.
pub fn calculate_pending_remuneration(
    end_date: NaiveDate,
    economics: &SeveranceEconomics,
    step_number: u32,
) -> PendingRemunerationResult {
    let days_worked = end_date.day().min(COMMERCIAL_MONTH_DAYS);

    let base_salary = prorate(economics.base_salary, days_worked);
    let gratification = prorate(economics.gratification, days_worked);
    let assignments = prorate(economics.assignments, days_worked);
    let variable_average = prorate(economics.variable_average, days_worked);
    let total = base_salary + gratification + assignments + variable_average;

    let audit_step = AuditStep {
        step_number,
        rule_id: "pending_remuneration".to_string(),
        rule_name: "Pending Remuneration".to_string(),
        clause_ref: "Art. 55".to_string(),
        input: serde_json::json!({
            "end_date": end_date.to_string(),
            "days_worked": days_worked,
        }),
        output: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "gratification": gratification.normalize().to_string(),
            "assignments": assignments.normalize().to_string(),
            "variable_average": variable_average.normalize().to_string(),
            "total": total.normalize().to_string(),
        }),
        reasoning: format!(
            "{} of {} days worked in the final month = ${}",
            days_worked,
            COMMERCIAL_MONTH_DAYS,
            total.normalize()
        ),
    };

    PendingRemunerationResult {
        remuneration: PendingRemuneration {
            days_worked,
            base_salary,
            gratification,
            assignments,
            variable_average,
            total,
        },
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

    fn economics() -> SeveranceEconomics {
        SeveranceEconomics {
            base_salary: dec("1000000"),
            gratification: dec("200000"),
            assignments: dec("100000"),
            variable_average: dec("50000"),
            taxable_salary: dec("1350000"),
            full_salary: dec("1350000"),
            salary_cap: dec("3571469"),
            capped_salary: dec("1350000"),
            is_capped: false,
            uf: dec("39682.99"),
        }
    }

    #[test]
    fn test_prorates_each_component() {
        let end = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        let result = calculate_pending_remuneration(end, &economics(), 1).remuneration;
        assert_eq!(result.days_worked, 9);
        assert_eq!(result.base_salary, dec("300000"));
        assert_eq!(result.gratification, dec("60000"));
        assert_eq!(result.assignments, dec("30000"));
        assert_eq!(result.variable_average, dec("15000"));
        assert_eq!(result.total, dec("405000"));
    }

    #[test]
    fn test_thirty_first_counts_as_thirty() {
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let result = calculate_pending_remuneration(end, &economics(), 1).remuneration;
        assert_eq!(result.days_worked, 30);
        assert_eq!(result.base_salary, dec("1000000"));
    }

    #[test]
    fn test_components_rounded_individually() {
        let mut econ = economics();
        econ.base_salary = dec("1000001");
        let end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let result = calculate_pending_remuneration(end, &econ, 1).remuneration;
        // 1000001 / 30 = 33333.3667 -> 33333
        assert_eq!(result.base_salary, dec("33333"));
    }
}
