//! Length-of-service calculation.
//!
//! This module computes years, months and days of service using the 30-day
//! commercial month for borrowing, and the indemnity years derived from them
//! under Art. 163 of the Labor Code.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, IndemnityCapRule, ServiceTime};

use super::money::COMMERCIAL_MONTH_DAYS;

/// Maximum indemnity years for contracts subject to the cap.
pub const MAX_INDEMNITY_YEARS: u32 = 11;

/// Remaining months from which a partial year counts as a full one.
pub const PARTIAL_YEAR_MONTHS: u32 = 6;

/// Contracts starting before this date are exempt from the 11-year cap.
pub fn legacy_cap_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(1981, 8, 14).expect("Valid cap cutoff date")
}

/// The result of a service time calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct ServiceTimeResult {
    /// The computed length of service.
    pub service_time: ServiceTime,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Month and day difference between two dates, borrowing 30-day months.
///
/// Returns `(years, months, days)`. A negative day difference borrows 30 days
/// from the months; a negative month difference borrows 12 months from the
/// years. Actual month lengths are ignored.
fn calendar_difference(from: NaiveDate, to: NaiveDate) -> (i32, i32, i32) {
    let mut years = to.year() - from.year();
    let mut months = to.month() as i32 - from.month() as i32;
    let mut days = to.day() as i32 - from.day() as i32;

    if days < 0 {
        months -= 1;
        days += COMMERCIAL_MONTH_DAYS as i32;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    (years, months, days)
}

/// Calculates the length of service between two dates.
///
/// Indemnity years are the whole years of service plus one when the
/// remaining months reach six. Under [`IndemnityCapRule::LegacyExemption`]
/// contracts that started before 14 August 1981 are not capped; otherwise
/// indemnity years are capped at 11.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `end` precedes `start`.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::calculate_service_time;
/// use chile_labor_engine::models::IndemnityCapRule;
/// use chrono::NaiveDate;
///
/// let result = calculate_service_time(
///     NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
///     IndemnityCapRule::LegacyExemption,
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(result.service_time.years, 4);
/// assert_eq!(result.service_time.months, 11);
/// assert_eq!(result.service_time.days, 8);
/// assert_eq!(result.service_time.indemnity_years, 5);
/// ```
pub fn calculate_service_time(
    start: NaiveDate,
    end: NaiveDate,
    cap_rule: IndemnityCapRule,
    step_number: u32,
) -> EngineResult<ServiceTimeResult> {
    if end < start {
        return Err(EngineError::invalid_input(
            "end_date",
            format!("{} is before start date {}", end, start),
        ));
    }

    let (years, months, days) = calendar_difference(start, end);
    let years = years.max(0) as u32;
    let months = months.max(0) as u32;
    let days = days.max(0) as u32;

    let indemnity_years = if months >= PARTIAL_YEAR_MONTHS {
        years + 1
    } else {
        years
    };

    let exempt = match cap_rule {
        IndemnityCapRule::LegacyExemption => start < legacy_cap_cutoff(),
        IndemnityCapRule::Unconditional => false,
    };
    let capped_indemnity_years = if exempt {
        indemnity_years
    } else {
        indemnity_years.min(MAX_INDEMNITY_YEARS)
    };

    let reasoning = if exempt {
        format!(
            "{}y {}m {}d of service; {} indemnity years, uncapped (contract started before {})",
            years,
            months,
            days,
            indemnity_years,
            legacy_cap_cutoff()
        )
    } else if capped_indemnity_years < indemnity_years {
        format!(
            "{}y {}m {}d of service; {} indemnity years capped at {}",
            years, months, days, indemnity_years, MAX_INDEMNITY_YEARS
        )
    } else {
        format!(
            "{}y {}m {}d of service; {} indemnity years",
            years, months, days, indemnity_years
        )
    };

    let service_time = ServiceTime {
        years,
        months,
        days,
        indemnity_years,
        capped_indemnity_years,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "service_time".to_string(),
        rule_name: "Length of Service".to_string(),
        clause_ref: "Art. 163".to_string(),
        input: serde_json::json!({
            "start_date": start.to_string(),
            "end_date": end.to_string(),
            "cap_rule": cap_rule,
        }),
        output: serde_json::json!({
            "years": years,
            "months": months,
            "days": days,
            "indemnity_years": indemnity_years,
            "capped_indemnity_years": capped_indemnity_years,
        }),
        reasoning,
    };

    Ok(ServiceTimeResult {
        service_time,
        audit_step,
    })
}
