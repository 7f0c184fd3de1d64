//! Payroll (sueldo líquido) input and result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PENSION_PROVIDER;

use super::AuditStep;

/// How the monthly gratification is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GratificationMode {
    /// Use the amount given in the input.
    Manual,
    /// 25% of remuneration, capped at 4.75 IMM a year (Art. 50).
    #[default]
    #[serde(alias = "legal_tope")]
    Statutory,
}

/// Health insurance system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthSystem {
    /// FONASA: the legal 7%.
    #[default]
    #[serde(alias = "fonasa")]
    Public,
    /// ISAPRE: a plan priced in UF, never below the legal 7%.
    #[serde(alias = "isapre")]
    Private,
}

/// Employment contract type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Contrato indefinido.
    #[default]
    #[serde(alias = "indefinido")]
    Indefinite,
    /// Contrato a plazo fijo.
    #[serde(alias = "plazo_fijo")]
    FixedTerm,
}

fn default_pension_fund() -> String {
    DEFAULT_PENSION_PROVIDER.to_string()
}

/// Everything needed to compute a monthly payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// How the gratification is determined.
    #[serde(default)]
    pub gratification_mode: GratificationMode,
    /// Gratification amount for [`GratificationMode::Manual`].
    #[serde(default)]
    pub gratification_amount: Decimal,
    /// Overtime hours worked in the month.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Taxable bonuses.
    #[serde(default)]
    pub bonus: Decimal,
    /// Non-taxable meal allowance (colación).
    #[serde(default)]
    pub meal_allowance: Decimal,
    /// Non-taxable transport allowance (movilización).
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Non-taxable travel allowance (viáticos).
    #[serde(default)]
    pub travel_allowance: Decimal,
    /// AFP name.
    #[serde(default = "default_pension_fund")]
    pub pension_fund: String,
    /// Health system.
    #[serde(default)]
    pub health_system: HealthSystem,
    /// Private plan price in UF.
    #[serde(default)]
    pub health_plan_uf: Decimal,
    /// Contract type.
    #[serde(default)]
    pub contract_type: ContractType,
    /// CCAF savings contribution, deducted before tax.
    #[serde(default)]
    pub ccaf_savings: Decimal,
    /// Voluntary pension savings (APV), deducted before tax.
    #[serde(default)]
    pub voluntary_pension_savings: Decimal,
    /// Union dues.
    #[serde(default)]
    pub union_dues: Decimal,
    /// Loan repayments.
    #[serde(default)]
    pub loan_repayment: Decimal,
    /// Court-ordered alimony.
    #[serde(default)]
    pub court_ordered_pension: Decimal,
    /// Any other deduction.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Whether CCAF and APV also reduce the pension/health contribution base.
    #[serde(default)]
    pub reduce_contribution_base: bool,
}

/// The taxable components and their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossBreakdown {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Gratification paid.
    pub gratification: Decimal,
    /// Overtime pay.
    pub overtime: Decimal,
    /// Taxable bonuses.
    pub bonus: Decimal,
    /// Sum of the above ("total imponible").
    pub total_taxable: Decimal,
}

/// Contribution caps and the capped bases they produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBases {
    /// Pension/health cap in pesos.
    pub pension_health_cap: Decimal,
    /// Unemployment insurance cap in pesos.
    pub unemployment_cap: Decimal,
    /// Capped base for pension and health.
    pub pension_health_base: Decimal,
    /// Capped base for unemployment insurance.
    pub unemployment_base: Decimal,
}

/// Mandatory social-security contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    /// AFP whose rate was applied.
    pub pension_fund: String,
    /// Pension rate applied.
    pub pension_rate: Decimal,
    /// Pension contribution.
    pub pension: Decimal,
    /// Legal 7% health amount.
    pub health_legal: Decimal,
    /// Health contribution charged.
    pub health: Decimal,
    /// Worker share of unemployment insurance.
    pub unemployment_insurance: Decimal,
}

impl Contributions {
    /// Sum of pension, health and unemployment insurance.
    pub fn total(&self) -> Decimal {
        self.pension + self.health + self.unemployment_insurance
    }
}

/// Deductions the worker chose or owes outside social security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoluntaryDeductions {
    /// CCAF savings (pre-tax).
    pub ccaf_savings: Decimal,
    /// APV (pre-tax).
    pub voluntary_pension_savings: Decimal,
    /// Union dues.
    pub union_dues: Decimal,
    /// Loan repayments.
    pub loan_repayment: Decimal,
    /// Court-ordered alimony.
    pub court_ordered_pension: Decimal,
    /// Other deductions.
    pub other_deductions: Decimal,
}

impl VoluntaryDeductions {
    /// Pre-tax contributions (CCAF + APV).
    pub fn pre_tax(&self) -> Decimal {
        self.ccaf_savings + self.voluntary_pension_savings
    }

    /// Deductions taken after tax.
    pub fn post_tax(&self) -> Decimal {
        self.union_dues + self.loan_repayment + self.court_ordered_pension + self.other_deductions
    }
}

/// Indicator values the payslip was computed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEconomics {
    /// UF value.
    pub uf: Decimal,
    /// UTM value.
    pub utm: Decimal,
    /// IMM value.
    pub imm: Decimal,
}

/// The complete payslip breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Indicators used.
    pub economics: PayrollEconomics,
    /// Taxable components.
    pub gross: GrossBreakdown,
    /// Gross taxable total less pre-tax contributions.
    pub tax_reduced_base: Decimal,
    /// Capped contribution bases.
    pub bases: ContributionBases,
    /// Mandatory contributions.
    pub contributions: Contributions,
    /// Base for the income tax.
    pub tax_base: Decimal,
    /// Income tax.
    pub tax: Decimal,
    /// Sum of meal, transport and travel allowances.
    pub non_taxable_total: Decimal,
    /// Voluntary and court-ordered deductions.
    pub deductions: VoluntaryDeductions,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Audit trace of every step.
    pub audit_trace: Vec<AuditStep>,
}
