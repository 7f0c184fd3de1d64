//! Severance (finiquito) input and result models.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::AuditStep;

/// The Labor Code article invoked to terminate the contract.
///
/// Only [`TerminationCause::Article161`] (business needs, "necesidades de la
/// empresa") gives rise to the years-of-service and notice indemnities.
///
/// Causes deserialize leniently from a string or a number: non-digit
/// characters are stripped, and an empty value means Art. 161. Codes too
/// large for an article number become `Other(u16::MAX)`.
///
/// # Example
///
/// ```
/// use chile_labor_engine::models::TerminationCause;
///
/// let cause: TerminationCause = serde_json::from_str("\"Art. 161\"").unwrap();
/// assert_eq!(cause, TerminationCause::Article161);
/// assert_eq!(TerminationCause::from_code("160"), TerminationCause::Article160);
/// assert_eq!(TerminationCause::from_code("163").code(), 163);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TerminationCause {
    /// Art. 159: mutual agreement, resignation, death, expiry of term or work.
    Article159,
    /// Art. 160: dismissal for serious misconduct.
    Article160,
    /// Art. 161: business needs or employer's discretion ("sin causa").
    #[default]
    Article161,
    /// Any other article number.
    Other(u16),
}

impl TerminationCause {
    /// Parses a cause code, ignoring any non-digit characters.
    ///
    /// A code without digits falls back to Art. 161. A code too large for
    /// an article number is `Other(u16::MAX)`.
    pub fn from_code(code: &str) -> Self {
        let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Self::Article161;
        }
        match digits.parse::<u16>() {
            Ok(n) => Self::from_number(n),
            Err(_) => Self::Other(u16::MAX),
        }
    }

    fn from_number(code: u16) -> Self {
        match code {
            159 => Self::Article159,
            160 => Self::Article160,
            161 => Self::Article161,
            other => Self::Other(other),
        }
    }

    /// Returns the article number.
    pub fn code(&self) -> u16 {
        match self {
            Self::Article159 => 159,
            Self::Article160 => 160,
            Self::Article161 => 161,
            Self::Other(code) => *code,
        }
    }

    /// Returns true for dismissal without cause (Art. 161).
    pub fn is_without_cause(&self) -> bool {
        matches!(self, Self::Article161)
    }
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TerminationCause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code().to_string())
    }
}

impl<'de> Deserialize<'de> for TerminationCause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Self::from_number(u16::try_from(n).unwrap_or(u16::MAX)),
            Repr::Text(text) => Self::from_code(&text),
        })
    }
}

/// How the 11-year cap on indemnity years is applied (Art. 163).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndemnityCapRule {
    /// Contracts that started before 1981-08-14 are not capped.
    #[default]
    LegacyExemption,
    /// Every contract is capped at 11 years.
    Unconditional,
}

/// Rule variants that change how a settlement is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceRules {
    /// How the 11-year cap is applied.
    #[serde(default)]
    pub cap_rule: IndemnityCapRule,
    /// Whether the unemployment-insurance estimate is subtracted from the total.
    #[serde(default = "default_true")]
    pub subtract_unemployment_from_total: bool,
}

impl Default for SeveranceRules {
    fn default() -> Self {
        Self {
            cap_rule: IndemnityCapRule::default(),
            subtract_unemployment_from_total: true,
        }
    }
}

/// Toggles controlling which items enter the settlement.
///
/// Every toggle defaults to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceOptions {
    /// Include meal/transport assignments in the indemnity base.
    #[serde(default = "default_true")]
    pub include_assignments_in_severance_base: bool,
    /// Include meal/transport assignments in the vacation base.
    #[serde(default = "default_true")]
    pub include_assignments_in_vacation_base: bool,
    /// Compute the years-of-service indemnity.
    #[serde(default = "default_true")]
    pub enable_years_of_service: bool,
    /// Compute the indemnity in lieu of notice.
    #[serde(default = "default_true")]
    pub enable_notice: bool,
    /// Estimate the employer's unemployment-insurance contribution.
    #[serde(default = "default_true")]
    pub simulate_unemployment_contribution: bool,
}

impl Default for SeveranceOptions {
    fn default() -> Self {
        Self {
            include_assignments_in_severance_base: true,
            include_assignments_in_vacation_base: true,
            enable_years_of_service: true,
            enable_notice: true,
            simulate_unemployment_contribution: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Everything needed to compute a settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveranceInput {
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract; must not precede `start_date`.
    pub end_date: NaiveDate,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Monthly gratification.
    #[serde(default)]
    pub gratification: Decimal,
    /// Fixed monthly assignments (meal and transport).
    #[serde(default)]
    pub assignments: Decimal,
    /// Average of variable pay over the last three months.
    #[serde(default)]
    pub variable_average: Decimal,
    /// The termination cause.
    #[serde(default)]
    pub cause: TerminationCause,
    /// Whether 30 days' prior notice was given.
    #[serde(default)]
    pub notice_given: bool,
    /// Business vacation days carried over from previous periods.
    #[serde(default)]
    pub pending_vacation_days: Decimal,
    /// Whether the worker is in an extreme zone (enhanced vacation accrual).
    #[serde(default)]
    pub extreme_zone: bool,
    /// UF value to use instead of the configuration's.
    #[serde(default)]
    pub uf_override: Option<Decimal>,
    /// Item toggles.
    #[serde(default)]
    pub options: SeveranceOptions,
    /// Rule variants.
    #[serde(default)]
    pub rules: SeveranceRules,
}

/// Length of service and the years it entitles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTime {
    /// Whole years of service.
    pub years: u32,
    /// Remaining months.
    pub months: u32,
    /// Remaining days (30-day months).
    pub days: u32,
    /// Years counted for indemnity (a remainder of six months or more adds one).
    pub indemnity_years: u32,
    /// Indemnity years after applying the 11-year cap.
    pub capped_indemnity_years: u32,
}

impl ServiceTime {
    /// Total whole months of service.
    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

/// The salary components used and the capped indemnity base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceEconomics {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Monthly gratification.
    pub gratification: Decimal,
    /// Fixed assignments.
    pub assignments: Decimal,
    /// Average variable pay.
    pub variable_average: Decimal,
    /// Indemnity base before capping.
    pub taxable_salary: Decimal,
    /// Vacation base ("remuneración íntegra").
    pub full_salary: Decimal,
    /// The 90 UF cap in pesos.
    pub salary_cap: Decimal,
    /// Indemnity base after capping.
    pub capped_salary: Decimal,
    /// Whether the cap reduced the base.
    pub is_capped: bool,
    /// UF value used.
    pub uf: Decimal,
}

/// An indemnity item with its amount and the reason it applies or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndemnityResult {
    /// Amount in pesos.
    pub amount: Decimal,
    /// Whether the indemnity applies.
    pub applied: bool,
    /// Human-readable explanation.
    pub reason: String,
}

impl IndemnityResult {
    /// An indemnity that does not apply.
    pub fn not_applied(reason: impl Into<String>) -> Self {
        Self {
            amount: Decimal::ZERO,
            applied: false,
            reason: reason.into(),
        }
    }
}

/// Vacation indemnity ("feriado proporcional" plus pending days).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationIndemnity {
    /// Total amount in pesos.
    pub amount: Decimal,
    /// Whether any days were owed.
    pub applied: bool,
    /// Human-readable explanation.
    pub reason: String,
    /// Share attributable to days accrued in the current period.
    pub proportional_amount: Decimal,
    /// Share attributable to days carried over.
    pub pending_amount: Decimal,
    /// Most recent work anniversary on or before the end date.
    pub last_anniversary: NaiveDate,
    /// Months since the anniversary, with the day remainder as a fraction.
    pub accrued_months: Decimal,
    /// Business days accrued this period.
    pub accrued_business_days: Decimal,
    /// Business days carried over.
    pub pending_business_days: Decimal,
    /// Accrued plus carried business days.
    pub total_business_days: Decimal,
    /// Weekends and holidays crossed while projecting the days.
    pub non_business_days: u32,
    /// Business plus non-business days.
    pub calendar_days: Decimal,
    /// Monthly vacation base divided by 30.
    pub daily_rate: Decimal,
    /// Whether the projection hit its iteration limit.
    pub projection_truncated: bool,
}

/// Salary owed for the days worked in the final month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRemuneration {
    /// Days worked in the final month, at most 30.
    pub days_worked: u32,
    /// Prorated base salary.
    pub base_salary: Decimal,
    /// Prorated gratification.
    pub gratification: Decimal,
    /// Prorated assignments.
    pub assignments: Decimal,
    /// Prorated variable pay.
    pub variable_average: Decimal,
    /// Sum of the prorated components.
    pub total: Decimal,
}

/// Estimated employer contribution to the worker's unemployment account,
/// deductible from the years-of-service indemnity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnemploymentEstimate {
    /// Estimated amount in pesos.
    pub amount: Decimal,
    /// Contribution rate used.
    pub rate: Decimal,
    /// Months of service counted.
    pub months: u32,
    /// Human-readable explanation.
    pub reason: String,
}

/// The complete settlement breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceResult {
    /// Length of service.
    pub service_time: ServiceTime,
    /// Salary components and indemnity base.
    pub economics: SeveranceEconomics,
    /// Indemnity for years of service (Art. 163).
    pub years_of_service: IndemnityResult,
    /// Indemnity in lieu of notice (Art. 161/162).
    pub notice: IndemnityResult,
    /// Vacation indemnity (Art. 73).
    pub vacation: VacationIndemnity,
    /// Salary for days worked in the last month.
    pub pending_remuneration: PendingRemuneration,
    /// Unemployment-insurance estimate, when simulated.
    pub unemployment_deduction: Option<UnemploymentEstimate>,
    /// Grand total.
    pub total: Decimal,
    /// Audit trace of every step.
    pub audit_trace: Vec<AuditStep>,
}
