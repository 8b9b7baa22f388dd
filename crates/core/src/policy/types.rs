//! Approval policy domain types.
//!
//! A policy is an abstract description of who approves an expense and how
//! the per-step decisions combine into a final verdict. Steps are abstract
//! (manager / role / specific user); binding them to concrete approvers
//! happens at submission time in the sequence builder.

use serde::{Deserialize, Serialize};
use spendrail_shared::types::{CompanyId, PolicyId, UserId};

use crate::directory::types::UserRole;
use crate::workflow::error::ApprovalError;

/// How one abstract policy step picks its approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRule {
    /// The submitting employee's direct manager (only if flagged approver).
    Manager,
    /// The first approver-flagged company user with the given role.
    Role(UserRole),
    /// A specific user, regardless of the approver flag.
    SpecificUser(UserId),
}

/// One abstract step of an approval policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStep {
    /// How the approver is picked.
    pub rule: StepRule,
    /// Declared position in the policy (resolution order).
    pub order: u32,
}

/// Strategy for deciding overall approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Every resolved approver must approve, in order.
    Sequential,
    /// Approved once `threshold` percent of all steps have approved.
    PercentageThreshold {
        /// Required percentage of approving steps, 1..=100.
        threshold: u8,
    },
}

impl ResolutionMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::PercentageThreshold { .. } => "percentage_threshold",
        }
    }
}

impl std::fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An approval policy for a company.
///
/// At most one policy per company is active at a time; the policy store's
/// write path enforces that activating a new policy deactivates prior ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    /// Unique identifier.
    pub id: PolicyId,
    /// The company this policy belongs to.
    pub company_id: CompanyId,
    /// Abstract steps, in declared order.
    pub steps: Vec<PolicyStep>,
    /// How step decisions combine into a final verdict.
    pub mode: ResolutionMode,
    /// Whether this is the company's active policy.
    pub is_active: bool,
}

impl ApprovalPolicy {
    /// Validates the policy configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::InvalidPolicyStep` if the percentage
    /// threshold is outside 1..=100.
    pub fn validate(&self) -> Result<(), ApprovalError> {
        if let ResolutionMode::PercentageThreshold { threshold } = self.mode
            && !(1..=100).contains(&threshold)
        {
            return Err(ApprovalError::InvalidPolicyStep(format!(
                "percentage threshold must be within 1..=100, got {threshold}"
            )));
        }
        Ok(())
    }
}
