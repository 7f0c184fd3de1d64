//! Core data models for the labor entitlements engine.
//!
//! This module contains the input records and result breakdowns of both
//! engines, and the audit step they share.

mod audit;
mod payroll;
mod severance;

pub use audit::AuditStep;
pub use payroll::{
    ContractType, ContributionBases, Contributions, GratificationMode, GrossBreakdown,
    HealthSystem, PayrollEconomics, PayrollInput, PayrollResult, VoluntaryDeductions,
};
pub use severance::{
    IndemnityCapRule, IndemnityResult, PendingRemuneration, ServiceTime, SeveranceEconomics,
    SeveranceInput, SeveranceOptions, SeveranceResult, SeveranceRules, TerminationCause,
    UnemploymentEstimate, VacationIndemnity,
};
