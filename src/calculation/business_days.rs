//! Calendar projection of business days.
//!
//! Vacation owed at termination is expressed in business days, but it is paid
//! in calendar days: every weekend and holiday that falls inside the period
//! the worker would have taken off is paid as well.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::HolidayCalendar;

/// Upper bound on the days walked by a projection.
pub const MAX_PROJECTION_ITERATIONS: u32 = 1000;

/// The outcome of walking the calendar forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarProjection {
    /// Business days counted.
    pub business_days: u32,
    /// Weekends and holidays crossed.
    pub non_business_days: u32,
    /// Whether the walk stopped at [`MAX_PROJECTION_ITERATIONS`].
    pub truncated: bool,
}

/// Walks the calendar from the day after `from` until `business_days` business
/// days have been counted.
///
/// A fractional target counts its partial day as a whole business day.
/// Weekends and dates in `calendar` are counted as non-business days.
///
/// # Example
///
/// ```
/// use chile_labor_engine::calculation::project_business_days;
/// use chile_labor_engine::config::HolidayCalendar;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// // 2026-01-09 is a Friday: the weekend is crossed before five business days.
/// let friday = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
/// let projection =
///     project_business_days(friday, Decimal::new(5, 0), &HolidayCalendar::default());
///
/// assert_eq!(projection.business_days, 5);
/// assert_eq!(projection.non_business_days, 2);
/// ```
pub fn project_business_days(
    from: NaiveDate,
    business_days: Decimal,
    calendar: &HolidayCalendar,
) -> CalendarProjection {
    let mut business = 0u32;
    let mut non_business = 0u32;
    let mut iterations = 0u32;
    let mut current = from.checked_add_days(Days::new(1));

    while let Some(date) = current {
        if Decimal::from(business) >= business_days || iterations >= MAX_PROJECTION_ITERATIONS {
            break;
        }

        if calendar.is_business_day(date) {
            business += 1;
        } else {
            non_business += 1;
        }

        iterations += 1;
        current = date.checked_add_days(Days::new(1));
    }

    let truncated = Decimal::from(business) < business_days;
    if truncated {
        warn!(
            from = %from,
            target = %business_days,
            counted = business,
            "Business day projection stopped before reaching its target"
        );
    }

    CalendarProjection {
        business_days: business,
        non_business_days: non_business,
        truncated,
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

    #[test]
    fn test_five_days_after_friday_is_seven_calendar_days() {
        let projection =
            project_business_days(date(2026, 1, 9), dec("5"), &HolidayCalendar::default());
        assert_eq!(projection.business_days + projection.non_business_days, 7);
        assert!(!projection.truncated);
    }

    #[test]
    fn test_holidays_are_skipped() {
        // 2026-05-21 is a Thursday holiday
        let calendar = HolidayCalendar::new([date(2026, 5, 21)]);
        let projection = project_business_days(date(2026, 5, 19), dec("3"), &calendar);
        // Wed 20, (Thu 21), Fri 22, (Sat 23), (Sun 24), Mon 25
        assert_eq!(projection.business_days, 3);
        assert_eq!(projection.non_business_days, 3);
    }

    #[test]
    fn test_fraction_counts_a_whole_day() {
        let projection =
            project_business_days(date(2026, 1, 11), dec("1.5"), &HolidayCalendar::default());
        // Mon 12, Tue 13
        assert_eq!(projection.business_days, 2);
        assert_eq!(projection.non_business_days, 0);
    }

    #[test]
    fn test_zero_target_walks_nothing() {
        let projection =
            project_business_days(date(2026, 1, 9), Decimal::ZERO, &HolidayCalendar::default());
        assert_eq!(projection.business_days, 0);
        assert_eq!(projection.non_business_days, 0);
    }

    #[test]
    fn test_walk_is_bounded() {
        let projection =
            project_business_days(date(2026, 1, 9), dec("5000"), &HolidayCalendar::default());
        assert!(projection.truncated);
        assert_eq!(
            projection.business_days + projection.non_business_days,
            MAX_PROJECTION_ITERATIONS
        );
    }
}
