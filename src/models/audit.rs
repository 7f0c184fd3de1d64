//! Audit trace models.
//!
//! Every sub-computation of both engines records an [`AuditStep`] citing the
//! legal provision it applies, so a settlement or payslip can be explained
//! line by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use chile_labor_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "notice_indemnity".to_string(),
///     rule_name: "Notice Indemnity".to_string(),
///     clause_ref: "Art. 161".to_string(),
///     input: serde_json::json!({"notice_given": true}),
///     output: serde_json::json!({"amount": "0"}),
///     reasoning: "Prior notice was given".to_string(),
/// };
/// assert_eq!(step.rule_id, "notice_indemnity");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the legal provision for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
