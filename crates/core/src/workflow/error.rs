//! Workflow error types for the expense approval lifecycle.

use spendrail_shared::types::{CompanyId, ExpenseId, UserId};
use thiserror::Error;

/// Errors that can occur during approval operations.
///
/// Policy absence is deliberately NOT listed here: a company without an
/// active policy yields a zero-step expense, not a failure.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Referenced user does not exist in the org directory.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// Referenced company does not exist.
    #[error("Company {0} not found")]
    CompanyNotFound(CompanyId),

    /// Referenced expense does not exist.
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    /// The user has no pending step on the expense. Covers both
    /// "not your turn yet" and "you already decided".
    #[error("User {approver} has no pending approval step on this expense")]
    Unauthorized {
        /// The user who attempted to act.
        approver: UserId,
    },

    /// Malformed policy configuration.
    #[error("Invalid policy step: {0}")]
    InvalidPolicyStep(String),
}

impl ApprovalError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UserNotFound(_) | Self::CompanyNotFound(_) | Self::ExpenseNotFound(_) => 404,
            Self::Unauthorized { .. } => 403,
            Self::InvalidPolicyStep(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::CompanyNotFound(_) => "COMPANY_NOT_FOUND",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::Unauthorized { .. } => "NOT_AUTHORIZED_TO_APPROVE",
            Self::InvalidPolicyStep(_) => "INVALID_POLICY_STEP",
        }
    }
}
