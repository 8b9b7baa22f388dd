//! Expense domain types.
//!
//! An expense owns an ordered sequence of approval steps created once at
//! submission. Only step status, comment, and decision timestamp mutate
//! afterwards; steps are never added or removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use spendrail_shared::types::{CompanyId, ExpenseId, Money, UserId};

use crate::policy::types::ResolutionMode;

/// Expense status in the approval lifecycle.
///
/// Valid transitions:
/// - Submitted → InReview (initialization with at least one resolved step)
/// - InReview → Approved (resolution strategy satisfied)
/// - InReview → Rejected (any step rejected)
/// - any → Approved | Rejected (administrative override)
///
/// A zero-approver expense stays Submitted indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// Created, but no approver has been assigned.
    Submitted,
    /// Moving through its approval sequence.
    InReview,
    /// Finally approved (terminal).
    Approved,
    /// Finally rejected (terminal).
    Rejected,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "submitted" => Some(Self::Submitted),
            "in_review" => Some(Self::InReview),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further step decisions can change the status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not yet this approver's turn.
    Waiting,
    /// Awaiting this approver's decision.
    Pending,
    /// Approved by this approver.
    Approved,
    /// Rejected by this approver.
    Rejected,
}

impl StepStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An approver's decision on their pending step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve the step.
    Approve,
    /// Reject the step (terminal for the whole expense).
    Reject,
}

/// A terminal status an override can force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    /// Force the expense to approved.
    Approved,
    /// Force the expense to rejected.
    Rejected,
}

impl From<TerminalStatus> for ExpenseStatus {
    fn from(status: TerminalStatus) -> Self {
        match status {
            TerminalStatus::Approved => Self::Approved,
            TerminalStatus::Rejected => Self::Rejected,
        }
    }
}

/// Expense category from the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Travel costs.
    Travel,
    /// Food and dining.
    Food,
    /// Accommodation.
    Accommodation,
    /// Office supplies.
    Office,
    /// Entertainment.
    Entertainment,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Food => "food",
            Self::Accommodation => "accommodation",
            Self::Office => "office",
            Self::Entertainment => "entertainment",
            Self::Other => "other",
        }
    }
}

/// One concrete approval step, bound to a real approver at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// The user who decides this step.
    pub approver_id: UserId,
    /// 1-based position in the resolved sequence (contiguous, gap-free).
    pub order: u32,
    /// Current step status.
    pub status: StepStatus,
    /// Approver's comment, set when acting.
    pub comment: Option<String>,
    /// When the approver acted.
    pub acted_at: Option<DateTime<Utc>>,
}

/// Audit record of an administrative override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// The administrator who forced the resolution.
    pub actor_id: UserId,
    /// When the override happened.
    pub at: DateTime<Utc>,
    /// Why (or a default message when none was given).
    pub comment: String,
}

/// An expense claim moving through approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier.
    pub id: ExpenseId,
    /// The submitting employee.
    pub employee_id: UserId,
    /// The employee's company.
    pub company_id: CompanyId,
    /// Amount as submitted, in the submission currency.
    pub amount: Money,
    /// Amount normalized into the company's base currency (2 decimals).
    pub normalized: Money,
    /// Expense category.
    pub category: ExpenseCategory,
    /// Free-form description.
    pub description: String,
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// Lifecycle status.
    pub status: ExpenseStatus,
    /// Resolution mode snapshotted from the policy at submission.
    pub resolution: ResolutionMode,
    /// Resolved approval sequence; empty when no policy step resolved.
    pub steps: Vec<ApprovalStep>,
    /// Set when an administrator forced the final status.
    pub override_record: Option<OverrideRecord>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Returns the single step currently awaiting a decision, if any.
    #[must_use]
    pub fn pending_step(&self) -> Option<&ApprovalStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Pending)
    }

    /// Returns true if the user appears anywhere in the approval sequence.
    #[must_use]
    pub fn has_approver(&self, user_id: UserId) -> bool {
        self.steps.iter().any(|s| s.approver_id == user_id)
    }
}
