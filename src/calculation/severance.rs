//! The severance (finiquito) engine.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EconomicConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, SeveranceInput, SeveranceResult};

use super::money::{MAX_AMOUNT, MAX_QUANTITY, ensure_within};
use super::notice::calculate_notice;
use super::pending_remuneration::calculate_pending_remuneration;
use super::service_time::calculate_service_time;
use super::severance_base::calculate_severance_base;
use super::unemployment_estimate::estimate_unemployment_contribution;
use super::vacation::{VacationParams, calculate_vacation};
use super::years_of_service::calculate_years_of_service;

/// Calculates a complete termination settlement.
///
/// The steps run in a fixed order: service time, indemnity base, years of
/// service, notice, vacation, pending remuneration and the unemployment
/// insurance estimate. Each contributes one step to the audit trace.
///
/// The UF override is used when it is positive; otherwise the configured UF.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the end date precedes the start
/// date or an amount or quantity is out of range, and
/// [`EngineError::InvalidConfig`] if the UF in effect is not positive.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::calculate_severance;
/// use chile_labor_engine::config::EconomicConfig;
/// use chile_labor_engine::models::SeveranceInput;
///
/// let input: SeveranceInput = serde_json::from_str(r#"{
///     "start_date": "2021-03-01",
///     "end_date": "2026-02-09",
///     "base_salary": "1000000",
///     "gratification": "200000",
///     "cause": "161"
/// }"#).unwrap();
///
/// let result = calculate_severance(&input, &EconomicConfig::default()).unwrap();
/// assert_eq!(result.service_time.capped_indemnity_years, 5);
/// assert!(result.years_of_service.applied);
/// ```
pub fn calculate_severance(
    input: &SeveranceInput,
    config: &EconomicConfig,
) -> EngineResult<SeveranceResult> {
    for (field, value) in [
        ("base_salary", input.base_salary),
        ("gratification", input.gratification),
        ("assignments", input.assignments),
        ("variable_average", input.variable_average),
    ] {
        ensure_within(field, value, MAX_AMOUNT)?;
    }
    ensure_within("pending_vacation_days", input.pending_vacation_days, MAX_QUANTITY)?;
    if let Some(uf) = input.uf_override {
        ensure_within("uf_override", uf, MAX_QUANTITY)?;
    }

    let uf = input
        .uf_override
        .filter(|uf| *uf > Decimal::ZERO)
        .unwrap_or_else(|| config.uf());
    if uf <= Decimal::ZERO {
        return Err(EngineError::invalid_config(
            "uf",
            format!("must be greater than zero (got {})", uf),
        ));
    }

    let mut audit_trace: Vec<AuditStep> = Vec::with_capacity(7);
    let mut step_number: u32 = 1;

    let service = calculate_service_time(
        input.start_date,
        input.end_date,
        input.rules.cap_rule,
        step_number,
    )?;
    let service_time = service.service_time;
    audit_trace.push(service.audit_step);
    step_number += 1;

    let base = calculate_severance_base(input, uf, config.caps().severance_uf, step_number);
    let economics = base.economics;
    audit_trace.push(base.audit_step);
    step_number += 1;

    let years = calculate_years_of_service(
        input.cause,
        input.options.enable_years_of_service,
        service_time.capped_indemnity_years,
        economics.capped_salary,
        step_number,
    );
    audit_trace.push(years.audit_step);
    step_number += 1;

    let notice = calculate_notice(
        input.cause,
        input.options.enable_notice,
        input.notice_given,
        economics.capped_salary,
        step_number,
    );
    audit_trace.push(notice.audit_step);
    step_number += 1;

    let vacation = calculate_vacation(
        VacationParams {
            start_date: input.start_date,
            end_date: input.end_date,
            full_salary: economics.full_salary,
            pending_days: input.pending_vacation_days,
            extreme_zone: input.extreme_zone,
            factors: config.vacation(),
            holidays: config.holidays(),
        },
        step_number,
    );
    audit_trace.push(vacation.audit_step);
    step_number += 1;

    let pending = calculate_pending_remuneration(input.end_date, &economics, step_number);
    audit_trace.push(pending.audit_step);
    step_number += 1;

    let unemployment = estimate_unemployment_contribution(
        input.cause,
        input.options.simulate_unemployment_contribution,
        &service_time,
        economics.capped_salary,
        config.rates().unemployment_indefinite_worker,
        step_number,
    );
    audit_trace.push(unemployment.audit_step);

    let gross = years.indemnity.amount
        + notice.indemnity.amount
        + vacation.vacation.amount
        + pending.remuneration.total;
    let deduction = match &unemployment.estimate {
        Some(estimate) if input.rules.subtract_unemployment_from_total => estimate.amount,
        _ => Decimal::ZERO,
    };
    let total = gross - deduction;

    debug!(
        cause = %input.cause,
        indemnity_years = service_time.capped_indemnity_years,
        is_capped = economics.is_capped,
        total = %total,
        "Severance calculated"
    );

    Ok(SeveranceResult {
        service_time,
        economics,
        years_of_service: years.indemnity,
        notice: notice.indemnity,
        vacation: vacation.vacation,
        pending_remuneration: pending.remuneration,
        unemployment_deduction: unemployment.estimate,
        total,
        audit_trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HolidayCalendar;
    use crate::models::{SeveranceOptions, SeveranceRules, TerminationCause};
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input() -> SeveranceInput {
        SeveranceInput {
            start_date: date(2021, 3, 1),
            end_date: date(2026, 2, 9),
            base_salary: dec("1000000"),
            gratification: dec("200000"),
            assignments: dec("100000"),
            variable_average: Decimal::ZERO,
            cause: TerminationCause::Article161,
            notice_given: false,
            pending_vacation_days: Decimal::ZERO,
            extreme_zone: false,
            uf_override: None,
            options: SeveranceOptions::default(),
            rules: SeveranceRules::default(),
        }
    }

    #[test]
    fn test_full_settlement_for_161() {
        let result = calculate_severance(&input(), &EconomicConfig::default()).unwrap();

        assert_eq!(result.service_time.years, 4);
        assert_eq!(result.service_time.months, 11);
        assert_eq!(result.service_time.days, 8);
        assert_eq!(result.economics.capped_salary, dec("1300000"));
        assert_eq!(result.years_of_service.amount, dec("6500000"));
        assert_eq!(result.notice.amount, dec("1300000"));
        assert_eq!(result.pending_remuneration.total, dec("390000"));

        let estimate = result.unemployment_deduction.as_ref().unwrap();
        assert_eq!(estimate.amount, dec("460200"));

        assert_eq!(
            result.total,
            result.years_of_service.amount
                + result.notice.amount
                + result.vacation.amount
                + result.pending_remuneration.total
                - estimate.amount
        );
        assert_eq!(result.audit_trace.len(), 7);
        assert_eq!(result.audit_trace[6].step_number, 7);
    }

    #[test]
    fn test_resignation_gets_vacation_and_pending_only() {
        let mut severance_input = input();
        severance_input.cause = TerminationCause::Article159;

        let result = calculate_severance(&severance_input, &EconomicConfig::default()).unwrap();
        assert_eq!(result.years_of_service.amount, Decimal::ZERO);
        assert_eq!(result.notice.amount, Decimal::ZERO);
        assert!(result.unemployment_deduction.is_none());
        assert_eq!(
            result.total,
            result.vacation.amount + result.pending_remuneration.total
        );
    }

    #[test]
    fn test_estimate_kept_but_not_subtracted() {
        let mut severance_input = input();
        severance_input.rules.subtract_unemployment_from_total = false;

        let result = calculate_severance(&severance_input, &EconomicConfig::default()).unwrap();
        assert!(result.unemployment_deduction.is_some());
        assert_eq!(
            result.total,
            result.years_of_service.amount
                + result.notice.amount
                + result.vacation.amount
                + result.pending_remuneration.total
        );
    }

    #[test]
    fn test_uf_override_changes_cap() {
        let mut severance_input = input();
        severance_input.base_salary = dec("5000000");
        severance_input.uf_override = Some(dec("40000"));

        let result = calculate_severance(&severance_input, &EconomicConfig::default()).unwrap();
        assert_eq!(result.economics.uf, dec("40000"));
        assert_eq!(result.economics.salary_cap, dec("3600000"));
        assert!(result.economics.is_capped);
    }

    #[test]
    fn test_capped_salary_stays_below_fractional_cap() {
        let mut severance_input = input();
        severance_input.base_salary = dec("5000000");
        severance_input.uf_override = Some(dec("39682.05"));

        let result = calculate_severance(&severance_input, &EconomicConfig::default()).unwrap();
        let ceiling = dec("39682.05") * dec("90");
        assert_eq!(result.economics.capped_salary, dec("3571384"));
        assert!(result.economics.capped_salary <= ceiling);
        assert_eq!(result.years_of_service.amount, dec("3571384") * dec("5"));
    }

    #[test]
    fn test_non_positive_override_falls_back_to_config() {
        let mut severance_input = input();
        severance_input.uf_override = Some(Decimal::ZERO);

        let config = EconomicConfig::default();
        let result = calculate_severance(&severance_input, &config).unwrap();
        assert_eq!(result.economics.uf, config.uf());
    }

    #[test]
    fn test_non_positive_uf_is_rejected() {
        let config = EconomicConfig::default().with_indicators(
            Decimal::ZERO,
            dec("69611"),
            None,
            date(2026, 2, 1),
        );
        let result = calculate_severance(&input(), &config);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut severance_input = input();
        severance_input.end_date = date(2020, 1, 1);
        let result = calculate_severance(&severance_input, &EconomicConfig::default());
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_out_of_range_inputs_are_rejected() {
        let config = EconomicConfig::default();

        let mut severance_input = input();
        severance_input.base_salary = Decimal::MAX;
        assert!(matches!(
            calculate_severance(&severance_input, &config),
            Err(EngineError::InvalidInput { field, .. }) if field == "base_salary"
        ));

        let mut severance_input = input();
        severance_input.pending_vacation_days = dec("1000001");
        assert!(matches!(
            calculate_severance(&severance_input, &config),
            Err(EngineError::InvalidInput { field, .. }) if field == "pending_vacation_days"
        ));

        let mut severance_input = input();
        severance_input.uf_override = Some(dec("5000000"));
        assert!(matches!(
            calculate_severance(&severance_input, &config),
            Err(EngineError::InvalidInput { field, .. }) if field == "uf_override"
        ));
    }

    #[test]
    fn test_holidays_lengthen_vacation() {
        let mut severance_input = input();
        severance_input.pending_vacation_days = dec("15");

        let plain = EconomicConfig::default().with_holidays(HolidayCalendar::default());
        let with_holidays = EconomicConfig::default();

        let a = calculate_severance(&severance_input, &plain).unwrap();
        let b = calculate_severance(&severance_input, &with_holidays).unwrap();
        assert!(b.vacation.non_business_days >= a.vacation.non_business_days);
    }

    #[test]
    fn test_identical_inputs_give_identical_results() {
        let config = EconomicConfig::default();
        let a = calculate_severance(&input(), &config).unwrap();
        let b = calculate_severance(&input(), &config).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_total_identity(
            base in 0i64..10_000_000,
            days in 0u64..15_000,
            cause in prop_oneof![Just("159"), Just("160"), Just("161")],
            notice_given in any::<bool>(),
            subtract in any::<bool>(),
        ) {
            let mut severance_input = input();
            severance_input.base_salary = Decimal::from(base);
            severance_input.end_date = severance_input.start_date + Days::new(days);
            severance_input.cause = TerminationCause::from_code(cause);
            severance_input.notice_given = notice_given;
            severance_input.rules.subtract_unemployment_from_total = subtract;

            let result = calculate_severance(&severance_input, &EconomicConfig::default()).unwrap();
            let deduction = match (&result.unemployment_deduction, subtract) {
                (Some(estimate), true) => estimate.amount,
                _ => Decimal::ZERO,
            };
            prop_assert_eq!(
                result.total,
                result.years_of_service.amount
                    + result.notice.amount
                    + result.vacation.amount
                    + result.pending_remuneration.total
                    - deduction
            );
            prop_assert!(result.economics.capped_salary <= result.economics.salary_cap);
            prop_assert!(result.pending_remuneration.days_worked <= 30);
            if notice_given {
                prop_assert_eq!(result.notice.amount, Decimal::ZERO);
            }
        }
    }
}
