//! Vacation indemnity ("feriado proporcional") (Art. 73).
//!
//! Days accrued since the last work anniversary are added to the days
//! carried over, projected onto the calendar after the end date, and paid
//! per calendar day at the full monthly salary divided by 30.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{HolidayCalendar, VacationFactors};
use crate::models::{AuditStep, VacationIndemnity};

use super::business_days::project_business_days;
use super::money::{COMMERCIAL_MONTH_DAYS, round_clp};

/// The result of the vacation indemnity calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct VacationResult {
    /// The indemnity.
    pub vacation: VacationIndemnity,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Everything the vacation indemnity depends on.
#[derive(Debug, Clone, Copy)]
pub struct VacationParams<'a> {
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract.
    pub end_date: NaiveDate,
    /// Monthly vacation base ("remuneración íntegra").
    pub full_salary: Decimal,
    /// Business days carried over from earlier periods.
    pub pending_days: Decimal,
    /// Whether the extreme-zone accrual factor applies.
    pub extreme_zone: bool,
    /// Accrual factors.
    pub factors: &'a VacationFactors,
    /// Non-business dates.
    pub holidays: &'a HolidayCalendar,
}

fn anniversary_in(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    // Feb 29 rolls over to Mar 1 in common years
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Returns the most recent work anniversary on or before `end`.
///
/// A Feb 29 start rolls over to Mar 1 in common years, and stepping back a
/// year keeps the rolled-over day.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::last_anniversary;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
/// assert_eq!(last_anniversary(start, end), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// ```
pub fn last_anniversary(start: NaiveDate, end: NaiveDate) -> NaiveDate {
    match anniversary_in(start, end.year()) {
        Some(date) if date <= end => date,
        Some(date) => anniversary_in(date, end.year() - 1).unwrap_or(start),
        None => start,
    }
}

/// Months elapsed from `anniversary` to `end`, with the day remainder as a
/// fraction of a 30-day month.
fn accrued_months(anniversary: NaiveDate, end: NaiveDate) -> Decimal {
    let mut months = end.month() as i32 - anniversary.month() as i32;
    let mut days = end.day() as i32 - anniversary.day() as i32;

    if days < 0 {
        months -= 1;
        days += COMMERCIAL_MONTH_DAYS as i32;
    }
    if months < 0 {
        months += 12;
    }

    Decimal::from(months) + Decimal::from(days) / Decimal::from(COMMERCIAL_MONTH_DAYS)
}

fn display(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Calculates the vacation indemnity owed at termination.
///
/// The total is `round(calendar_days × full_salary / 30)`. It is split into
/// the share of days accrued this period and the share carried over, each
/// rounded on its own from the unrounded total.
pub fn calculate_vacation(params: VacationParams<'_>, step_number: u32) -> VacationResult {
    let anniversary = last_anniversary(params.start_date, params.end_date);
    let months = accrued_months(anniversary, params.end_date);

    let factor = if params.extreme_zone {
        params.factors.extreme_zone
    } else {
        params.factors.standard
    };

    let accrued_business_days = months * factor;
    let total_business_days = accrued_business_days + params.pending_days;

    let projection = project_business_days(params.end_date, total_business_days, params.holidays);
    let calendar_days = total_business_days + Decimal::from(projection.non_business_days);

    let month_days = Decimal::from(COMMERCIAL_MONTH_DAYS);
    let raw_total = calendar_days * params.full_salary / month_days;
    let amount = round_clp(raw_total);

    let ratio = if total_business_days > Decimal::ZERO {
        accrued_business_days / total_business_days
    } else {
        Decimal::ZERO
    };
    let proportional_amount = round_clp(raw_total * ratio);
    let pending_amount = round_clp(raw_total * (Decimal::ONE - ratio));

    let applied = total_business_days > Decimal::ZERO;
    let reason = if applied {
        format!(
            "Business: {} + non-business: {} = {} calendar days",
            display(total_business_days),
            projection.non_business_days,
            display(calendar_days)
        )
    } else {
        "No vacation days owed".to_string()
    };

    let vacation = VacationIndemnity {
        amount,
        applied,
        reason: reason.clone(),
        proportional_amount,
        pending_amount,
        last_anniversary: anniversary,
        accrued_months: display(months),
        accrued_business_days: display(accrued_business_days),
        pending_business_days: params.pending_days,
        total_business_days: display(total_business_days),
        non_business_days: projection.non_business_days,
        calendar_days: display(calendar_days),
        daily_rate: display(params.full_salary / month_days),
        projection_truncated: projection.truncated,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "vacation_indemnity".to_string(),
        rule_name: "Vacation Indemnity".to_string(),
        clause_ref: "Art. 73".to_string(),
        input: serde_json::json!({
            "start_date": params.start_date.to_string(),
            "end_date": params.end_date.to_string(),
            "full_salary": params.full_salary.normalize().to_string(),
            "pending_days": params.pending_days.normalize().to_string(),
            "factor": factor.normalize().to_string(),
        }),
        output: serde_json::json!({
            "last_anniversary": anniversary.to_string(),
            "accrued_business_days": vacation.accrued_business_days.to_string(),
            "non_business_days": projection.non_business_days,
            "calendar_days": vacation.calendar_days.to_string(),
            "amount": amount.normalize().to_string(),
            "proportional_amount": proportional_amount.normalize().to_string(),
            "pending_amount": pending_amount.normalize().to_string(),
        }),
        reasoning: reason,
    };

    VacationResult {
        vacation,
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn factors() -> VacationFactors {
        VacationFactors {
            standard: dec("1.25"),
            extreme_zone: dec("1.67"),
        }
    }

    #[test]
    fn test_last_anniversary_same_year() {
        assert_eq!(
            last_anniversary(date(2020, 1, 5), date(2026, 3, 1)),
            date(2026, 1, 5)
        );
    }

    #[test]
    fn test_last_anniversary_on_end_date() {
        assert_eq!(
            last_anniversary(date(2020, 3, 1), date(2026, 3, 1)),
            date(2026, 3, 1)
        );
    }

    #[test]
    fn test_leap_day_anniversary_rolls_over() {
        assert_eq!(
            last_anniversary(date(2020, 2, 29), date(2025, 6, 1)),
            date(2025, 3, 1)
        );
        assert_eq!(
            last_anniversary(date(2020, 2, 29), date(2025, 2, 28)),
            date(2024, 3, 1)
        );
        assert_eq!(
            last_anniversary(date(2020, 2, 29), date(2024, 2, 28)),
            date(2023, 3, 1)
        );
        assert_eq!(
            last_anniversary(date(2020, 2, 29), date(2024, 3, 5)),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_leap_day_start_accrues_before_rollover() {
        let calendar = HolidayCalendar::default();
        let f = factors();
        // 2024-03-01 -> 2025-02-28: 11 months 27 days = 11.9 months, 14.875 days
        let result = calculate_vacation(
            VacationParams {
                start_date: date(2020, 2, 29),
                end_date: date(2025, 2, 28),
                full_salary: dec("900000"),
                pending_days: Decimal::ZERO,
                extreme_zone: false,
                factors: &f,
                holidays: &calendar,
            },
            1,
        );

        let vacation = result.vacation;
        assert_eq!(vacation.last_anniversary, date(2024, 3, 1));
        assert_eq!(vacation.accrued_months, dec("11.9"));
        assert_eq!(vacation.accrued_business_days, dec("14.88"));
        assert_eq!(vacation.non_business_days, 6);
        // 20.875 × 30000
        assert_eq!(vacation.amount, dec("626250"));
    }

    #[test]
    fn test_accrued_months_borrow() {
        // 2025-03-01 -> 2026-02-09: 11 months 8 days
        let months = accrued_months(date(2025, 3, 1), date(2026, 2, 9));
        assert_eq!(display(months), dec("11.27"));
    }

    #[test]
    fn test_accrued_only() {
        let calendar = HolidayCalendar::default();
        let f = factors();
        // 2025-07-12 -> 2026-01-09: 5 months 27 days = 5.9 months, 7.375 days
        let result = calculate_vacation(
            VacationParams {
                start_date: date(2025, 7, 12),
                end_date: date(2026, 1, 9),
                full_salary: dec("900000"),
                pending_days: Decimal::ZERO,
                extreme_zone: false,
                factors: &f,
                holidays: &calendar,
            },
            1,
        );

        let vacation = result.vacation;
        assert_eq!(vacation.accrued_business_days, dec("7.38"));
        assert_eq!(vacation.non_business_days, 4);
        assert_eq!(vacation.calendar_days, dec("11.38"));
        assert_eq!(vacation.daily_rate, dec("30000"));
        // 11.375 × 30000
        assert_eq!(vacation.amount, dec("341250"));
        assert_eq!(vacation.proportional_amount, dec("341250"));
        assert_eq!(vacation.pending_amount, Decimal::ZERO);
        assert!(vacation.applied);
    }

    #[test]
    fn test_pending_only() {
        let calendar = HolidayCalendar::default();
        let f = factors();
        // Anniversary on the end date (a Friday): nothing accrued
        let result = calculate_vacation(
            VacationParams {
                start_date: date(2020, 1, 9),
                end_date: date(2026, 1, 9),
                full_salary: dec("900000"),
                pending_days: dec("5"),
                extreme_zone: false,
                factors: &f,
                holidays: &calendar,
            },
            1,
        );

        let vacation = result.vacation;
        assert_eq!(vacation.calendar_days, dec("7"));
        assert_eq!(vacation.amount, dec("210000"));
        assert_eq!(vacation.proportional_amount, Decimal::ZERO);
        assert_eq!(vacation.pending_amount, dec("210000"));
    }

    #[test]
    fn test_nothing_owed() {
        let calendar = HolidayCalendar::default();
        let f = factors();
        let result = calculate_vacation(
            VacationParams {
                start_date: date(2020, 1, 9),
                end_date: date(2026, 1, 9),
                full_salary: dec("900000"),
                pending_days: Decimal::ZERO,
                extreme_zone: false,
                factors: &f,
                holidays: &calendar,
            },
            1,
        );
        assert_eq!(result.vacation.amount, Decimal::ZERO);
        assert!(!result.vacation.applied);
    }

    #[test]
    fn test_extreme_zone_accrues_more() {
        let calendar = HolidayCalendar::default();
        let f = factors();
        let params = |extreme_zone| VacationParams {
            start_date: date(2025, 1, 9),
            end_date: date(2026, 1, 8),
            full_salary: dec("900000"),
            pending_days: Decimal::ZERO,
            extreme_zone,
            factors: &f,
            holidays: &calendar,
        };

        let standard = calculate_vacation(params(false), 1).vacation;
        let extreme = calculate_vacation(params(true), 1).vacation;
        assert!(extreme.accrued_business_days > standard.accrued_business_days);
        assert!(extreme.amount > standard.amount);
    }
}
