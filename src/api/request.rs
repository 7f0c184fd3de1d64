//! Request types for the labor entitlements API.
//!
//! Numeric fields are coerced leniently, the way form input arrives: missing,
//! null or malformed amounts become zero, and currency strings such as
//! `"$1.200.000"` keep only their digits. Values beyond the engine limits are
//! malformed too. Dates must parse.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::calculation::{MAX_AMOUNT, MAX_QUANTITY};
use crate::config::DEFAULT_PENSION_PROVIDER;
use crate::models::{
    ContractType, GratificationMode, HealthSystem, PayrollInput, SeveranceInput, SeveranceOptions,
    SeveranceRules, TerminationCause,
};

/// Coerces a JSON value to a whole-peso amount.
///
/// Numbers are truncated to whole pesos. Strings keep only their digits, so
/// thousands separators and currency signs are dropped. Anything else, or
/// anything above [`MAX_AMOUNT`], is zero.
///
/// # Example
///
/// ```
/// use chile_labor_engine::api::coerce_amount;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(coerce_amount(&json!("$1.200.000")), Decimal::new(1_200_000, 0));
/// assert_eq!(coerce_amount(&json!(800000)), Decimal::new(800_000, 0));
/// assert_eq!(coerce_amount(&json!("n/a")), Decimal::ZERO);
/// ```
pub fn coerce_amount(value: &Value) -> Decimal {
    within(parse_amount(value), MAX_AMOUNT)
}

fn parse_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_number(&n.to_string())
            .map(|d| d.trunc())
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            Decimal::from_str(&digits).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

/// Coerces a JSON value to a fractional quantity (hours, days, UF).
///
/// A decimal comma is accepted. Anything unparsable, or larger in magnitude
/// than [`MAX_QUANTITY`], is zero.
pub fn coerce_quantity(value: &Value) -> Decimal {
    within(parse_quantity(value), MAX_QUANTITY)
}

fn parse_quantity(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_number(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .replace(',', ".")
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

fn within(value: Decimal, limit: Decimal) -> Decimal {
    if value.abs() > limit {
        Decimal::ZERO
    } else {
        value
    }
}

fn parse_number(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_amount).unwrap_or(Decimal::ZERO))
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_quantity).unwrap_or(Decimal::ZERO))
}

/// A UF override only counts when it is a positive number.
fn lenient_uf<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map(coerce_quantity)
        .filter(|uf| *uf > Decimal::ZERO))
}

fn lenient_cause<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<TerminationCause, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(code)) => TerminationCause::from_code(&code),
        Some(Value::Number(n)) => TerminationCause::from_code(&n.to_string()),
        _ => TerminationCause::default(),
    })
}

fn default_pension_fund() -> String {
    DEFAULT_PENSION_PROVIDER.to_string()
}

/// Request body for `POST /severance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveranceRequest {
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract.
    pub end_date: NaiveDate,
    /// Monthly base salary.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub base_salary: Decimal,
    /// Monthly gratification.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub gratification: Decimal,
    /// Fixed meal and transport assignments.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub assignments: Decimal,
    /// Average variable pay over the last three months.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub variable_average: Decimal,
    /// Termination cause code.
    #[serde(default, deserialize_with = "lenient_cause")]
    pub cause: TerminationCause,
    /// Whether 30 days' notice was given.
    #[serde(default)]
    pub notice_given: bool,
    /// Vacation business days carried over.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub pending_vacation_days: Decimal,
    /// Whether the extreme-zone accrual applies.
    #[serde(default)]
    pub extreme_zone: bool,
    /// UF value to use instead of the current one.
    #[serde(default, deserialize_with = "lenient_uf")]
    pub uf_override: Option<Decimal>,
    /// Item toggles.
    #[serde(default)]
    pub options: SeveranceOptions,
    /// Rule variants.
    #[serde(default)]
    pub rules: SeveranceRules,
}

impl From<SeveranceRequest> for SeveranceInput {
    fn from(req: SeveranceRequest) -> Self {
        SeveranceInput {
            start_date: req.start_date,
            end_date: req.end_date,
            base_salary: req.base_salary,
            gratification: req.gratification,
            assignments: req.assignments,
            variable_average: req.variable_average,
            cause: req.cause,
            notice_given: req.notice_given,
            pending_vacation_days: req.pending_vacation_days,
            extreme_zone: req.extreme_zone,
            uf_override: req.uf_override,
            options: req.options,
            rules: req.rules,
        }
    }
}

/// Request body for `POST /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Monthly base salary.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub base_salary: Decimal,
    /// Gratification mode.
    #[serde(default)]
    pub gratification_mode: GratificationMode,
    /// Manual gratification amount.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub gratification_amount: Decimal,
    /// Overtime hours.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub overtime_hours: Decimal,
    /// Taxable bonuses.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub bonus: Decimal,
    /// Meal allowance.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub meal_allowance: Decimal,
    /// Transport allowance.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub transport_allowance: Decimal,
    /// Travel allowance.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub travel_allowance: Decimal,
    /// AFP name.
    #[serde(default = "default_pension_fund")]
    pub pension_fund: String,
    /// Health system.
    #[serde(default)]
    pub health_system: HealthSystem,
    /// Private plan price in UF.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub health_plan_uf: Decimal,
    /// Contract type.
    #[serde(default)]
    pub contract_type: ContractType,
    /// CCAF savings.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub ccaf_savings: Decimal,
    /// Voluntary pension savings (APV).
    #[serde(default, deserialize_with = "lenient_amount")]
    pub voluntary_pension_savings: Decimal,
    /// Union dues.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub union_dues: Decimal,
    /// Loan repayments.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub loan_repayment: Decimal,
    /// Court-ordered alimony.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub court_ordered_pension: Decimal,
    /// Other deductions.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub other_deductions: Decimal,
    /// Whether CCAF and APV reduce the pension/health base.
    #[serde(default)]
    pub reduce_contribution_base: bool,
}

impl From<PayrollRequest> for PayrollInput {
    fn from(req: PayrollRequest) -> Self {
        PayrollInput {
            base_salary: req.base_salary,
            gratification_mode: req.gratification_mode,
            gratification_amount: req.gratification_amount,
            overtime_hours: req.overtime_hours,
            bonus: req.bonus,
            meal_allowance: req.meal_allowance,
            transport_allowance: req.transport_allowance,
            travel_allowance: req.travel_allowance,
            pension_fund: req.pension_fund,
            health_system: req.health_system,
            health_plan_uf: req.health_plan_uf,
            contract_type: req.contract_type,
            ccaf_savings: req.ccaf_savings,
            voluntary_pension_savings: req.voluntary_pension_savings,
            union_dues: req.union_dues,
            loan_repayment: req.loan_repayment,
            court_ordered_pension: req.court_ordered_pension,
            other_deductions: req.other_deductions,
            reduce_contribution_base: req.reduce_contribution_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_amount_coercion() {
        assert_eq!(coerce_amount(&json!("800.000")), dec("800000"));
        assert_eq!(coerce_amount(&json!("$1.200.000")), dec("1200000"));
        assert_eq!(coerce_amount(&json!(1500.75)), dec("1500"));
        assert_eq!(coerce_amount(&json!("")), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!(true)), Decimal::ZERO);
    }

    #[test]
    fn test_quantity_coercion() {
        assert_eq!(coerce_quantity(&json!("4,5")), dec("4.5"));
        assert_eq!(coerce_quantity(&json!(2.25)), dec("2.25"));
        assert_eq!(coerce_quantity(&json!("abc")), Decimal::ZERO);
    }

    #[test]
    fn test_oversized_values_coerce_to_zero() {
        let huge = json!("79.228.162.514.264.337.593.543.950.335");
        assert_eq!(coerce_amount(&huge), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!("1.000.000.000.000.001")), Decimal::ZERO);
        assert_eq!(coerce_amount(&json!(1e20)), Decimal::ZERO);
        assert_eq!(
            coerce_amount(&json!("1.000.000.000.000.000")),
            dec("1000000000000000")
        );

        assert_eq!(coerce_quantity(&json!("1000000,5")), Decimal::ZERO);
        assert_eq!(coerce_quantity(&json!(-2000000)), Decimal::ZERO);
        assert_eq!(coerce_quantity(&json!("1000000")), dec("1000000"));
    }

    #[test]
    fn test_oversized_payroll_amount_computes_as_zero() {
        let request: PayrollRequest = serde_json::from_value(json!({
            "base_salary": "79.228.162.514.264.337.593.543.950.335",
            "bonus": "79228162514264337593543950335"
        }))
        .unwrap();
        let input: PayrollInput = request.into();
        assert_eq!(input.base_salary, Decimal::ZERO);
        assert_eq!(input.bonus, Decimal::ZERO);

        let config = crate::config::EconomicConfig::default();
        let result = crate::calculation::calculate_payroll(&input, &config).unwrap();
        assert_eq!(result.net_pay, Decimal::ZERO);
    }

    #[test]
    fn test_severance_request_coerces_fields() {
        let request: SeveranceRequest = serde_json::from_value(json!({
            "start_date": "2021-03-01",
            "end_date": "2026-02-09",
            "base_salary": "$1.000.000",
            "gratification": null,
            "assignments": "oops",
            "cause": "",
            "pending_vacation_days": "3,5",
            "uf_override": "0"
        }))
        .unwrap();

        let input: SeveranceInput = request.into();
        assert_eq!(input.base_salary, dec("1000000"));
        assert_eq!(input.gratification, Decimal::ZERO);
        assert_eq!(input.assignments, Decimal::ZERO);
        assert_eq!(input.cause, TerminationCause::Article161);
        assert_eq!(input.pending_vacation_days, dec("3.5"));
        assert_eq!(input.uf_override, None);
        assert!(input.options.enable_notice);
    }

    #[test]
    fn test_severance_request_requires_dates() {
        let result: Result<SeveranceRequest, _> = serde_json::from_value(json!({
            "start_date": "2021-03-01",
            "base_salary": 1000000
        }));
        assert!(result.is_err());

        let result: Result<SeveranceRequest, _> = serde_json::from_value(json!({
            "start_date": "01/03/2021",
            "end_date": "2026-02-09"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_cause() {
        let request: SeveranceRequest = serde_json::from_value(json!({
            "start_date": "2021-03-01",
            "end_date": "2026-02-09",
            "cause": 160
        }))
        .unwrap();
        assert_eq!(request.cause, TerminationCause::Article160);
    }

    #[test]
    fn test_payroll_request_defaults() {
        let request: PayrollRequest =
            serde_json::from_value(json!({ "base_salary": "800.000" })).unwrap();
        let input: PayrollInput = request.into();
        assert_eq!(input.base_salary, dec("800000"));
        assert_eq!(input.pension_fund, "Modelo");
        assert_eq!(input.gratification_mode, GratificationMode::Statutory);
        assert_eq!(input.contract_type, ContractType::Indefinite);
    }

    #[test]
    fn test_payroll_request_spanish_values() {
        let request: PayrollRequest = serde_json::from_value(json!({
            "base_salary": 1500000,
            "health_system": "isapre",
            "health_plan_uf": "4,2",
            "contract_type": "plazo_fijo",
            "overtime_hours": "10"
        }))
        .unwrap();
        assert_eq!(request.health_system, HealthSystem::Private);
        assert_eq!(request.health_plan_uf, dec("4.2"));
        assert_eq!(request.contract_type, ContractType::FixedTerm);
        assert_eq!(request.overtime_hours, dec("10"));
    }
}
