//! Calculation logic for the labor entitlements engine.
//!
//! This module contains both engines and the steps they are built from:
//! service time, the capped indemnity base, years-of-service and notice
//! indemnities, the vacation indemnity with its calendar projection, pending
//! remuneration and the unemployment-insurance estimate for severance; and
//! overtime, gratification, social-security contributions and income tax
//! for payroll.
//!
//! Every step returns its value together with an [`AuditStep`](crate::models::AuditStep).

mod business_days;
mod contributions;
mod gratification;
mod income_tax;
mod money;
mod notice;
mod payroll;
mod pending_remuneration;
mod service_time;
mod severance;
mod severance_base;
mod unemployment_estimate;
mod vacation;
mod years_of_service;

pub use business_days::{CalendarProjection, MAX_PROJECTION_ITERATIONS, project_business_days};
pub use contributions::{ContributionParams, ContributionsResult, calculate_contributions};
pub use gratification::{
    GRATIFICATION_RATE, GratificationResult, OvertimeResult, calculate_gratification,
    calculate_overtime,
};
pub use income_tax::{IncomeTaxResult, calculate_income_tax, find_bracket};
pub use money::{
    COMMERCIAL_MONTH_DAYS, MAX_AMOUNT, MAX_QUANTITY, floor_clp, format_clp, round_clp,
};
pub use notice::{NoticeResult, REASON_NOTICE_GIVEN, calculate_notice};
pub use payroll::calculate_payroll;
pub use pending_remuneration::{PendingRemunerationResult, calculate_pending_remuneration};
pub use service_time::{
    MAX_INDEMNITY_YEARS, PARTIAL_YEAR_MONTHS, ServiceTimeResult, calculate_service_time,
    legacy_cap_cutoff,
};
pub use severance::calculate_severance;
pub use severance_base::{SeveranceBaseResult, calculate_severance_base};
pub use unemployment_estimate::{UnemploymentEstimateResult, estimate_unemployment_contribution};
pub use vacation::{VacationParams, VacationResult, calculate_vacation, last_anniversary};
pub use years_of_service::{
    REASON_CAUSE_NOT_APPLICABLE, REASON_DISABLED, YearsOfServiceResult, calculate_years_of_service,
};
