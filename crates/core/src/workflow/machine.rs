//! Expense state machine.
//!
//! Owns the lifecycle transitions: initialization from a built sequence,
//! per-step decisions, and resolution-strategy evaluation. All validation
//! happens before any field is written, so a failed call leaves the
//! expense exactly as it was.

use chrono::Utc;
use rust_decimal::Decimal;
use spendrail_shared::types::UserId;

use crate::expense::types::{ApprovalStep, Decision, Expense, ExpenseStatus, StepStatus};
use crate::policy::types::ResolutionMode;
use crate::workflow::error::ApprovalError;

/// Stateless service for expense lifecycle transitions.
pub struct ExpenseMachine;

impl ExpenseMachine {
    /// Installs the built sequence and sets the initial status.
    ///
    /// A non-empty sequence puts the expense `in_review` with its first
    /// step already pending (the builder sets that). An empty sequence
    /// leaves the expense `submitted`, and nothing will ever move it
    /// automatically.
    pub fn initialize(expense: &mut Expense, steps: Vec<ApprovalStep>) {
        expense.steps = steps;
        expense.status = if expense.steps.is_empty() {
            ExpenseStatus::Submitted
        } else {
            ExpenseStatus::InReview
        };
    }

    /// Applies an approver's decision to their pending step.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::Unauthorized` when the user has no pending
    /// step: wrong approver, not their turn yet, already decided, or the
    /// expense is terminal (terminal expenses have no pending steps).
    pub fn act(
        expense: &mut Expense,
        approver_id: UserId,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<(), ApprovalError> {
        let position = expense
            .steps
            .iter()
            .position(|s| s.approver_id == approver_id && s.status == StepStatus::Pending)
            .ok_or(ApprovalError::Unauthorized {
                approver: approver_id,
            })?;

        let step = &mut expense.steps[position];
        step.status = match decision {
            Decision::Approve => StepStatus::Approved,
            Decision::Reject => StepStatus::Rejected,
        };
        step.comment = comment;
        step.acted_at = Some(Utc::now());

        match decision {
            // Remaining waiting steps are left untouched, never visited.
            Decision::Reject => expense.status = ExpenseStatus::Rejected,
            Decision::Approve => Self::advance(expense),
        }
        Ok(())
    }

    /// Evaluates the resolution strategy after an approval.
    fn advance(expense: &mut Expense) {
        if let ResolutionMode::PercentageThreshold { threshold } = expense.resolution
            && Self::approval_percentage(expense) >= Decimal::from(threshold)
        {
            // Threshold met: approve now. Steps still waiting (or even
            // pending, with several approvers racing) stay as they are.
            expense.status = ExpenseStatus::Approved;
            return;
        }

        let next_waiting = expense
            .steps
            .iter_mut()
            .filter(|s| s.status == StepStatus::Waiting)
            .min_by_key(|s| s.order);
        match next_waiting {
            Some(step) => step.status = StepStatus::Pending,
            None => expense.status = ExpenseStatus::Approved,
        }
    }

    /// Percentage of steps approved so far, over ALL steps.
    ///
    /// Rejected steps count in the denominator but never in the numerator.
    fn approval_percentage(expense: &Expense) -> Decimal {
        let total = expense.steps.len();
        if total == 0 {
            return Decimal::ZERO;
        }
        let approved = expense
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Approved)
            .count();
        Decimal::from(approved) * Decimal::ONE_HUNDRED / Decimal::from(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use spendrail_shared::types::{CompanyId, Currency, ExpenseId, Money};

    use crate::expense::types::ExpenseCategory;

    fn step(approver_id: UserId, order: u32, status: StepStatus) -> ApprovalStep {
        ApprovalStep {
            approver_id,
            order,
            status,
            comment: None,
            acted_at: None,
        }
    }

    fn expense(mode: ResolutionMode, approvers: &[UserId]) -> Expense {
        let steps = approvers
            .iter()
            .enumerate()
            .map(|(idx, approver_id)| {
                let status = if idx == 0 {
                    StepStatus::Pending
                } else {
                    StepStatus::Waiting
                };
                step(*approver_id, u32::try_from(idx + 1).unwrap(), status)
            })
            .collect();

        let mut expense = Expense {
            id: ExpenseId::new(),
            employee_id: UserId::new(),
            company_id: CompanyId::new(),
            amount: Money::new(dec!(100), Currency::Usd),
            normalized: Money::new(dec!(100), Currency::Usd),
            category: ExpenseCategory::Travel,
            description: "taxi".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            status: ExpenseStatus::Submitted,
            resolution: mode,
            steps: Vec::new(),
            override_record: None,
            created_at: Utc::now(),
        };
        ExpenseMachine::initialize(&mut expense, steps);
        expense
    }

    #[test]
    fn test_initialize_with_steps_goes_in_review() {
        let expense = expense(ResolutionMode::Sequential, &[UserId::new()]);
        assert_eq!(expense.status, ExpenseStatus::InReview);
        assert_eq!(expense.pending_step().unwrap().order, 1);
    }

    #[test]
    fn test_initialize_without_steps_stays_submitted() {
        let expense = expense(ResolutionMode::Sequential, &[]);
        assert_eq!(expense.status, ExpenseStatus::Submitted);
        assert!(expense.steps.is_empty());
        assert!(expense.pending_step().is_none());
    }

    #[test]
    fn test_sequential_full_approval() {
        let (m, f) = (UserId::new(), UserId::new());
        let mut expense = expense(ResolutionMode::Sequential, &[m, f]);

        ExpenseMachine::act(&mut expense, m, Decision::Approve, None).unwrap();
        assert_eq!(expense.status, ExpenseStatus::InReview);
        assert_eq!(expense.steps[0].status, StepStatus::Approved);
        assert_eq!(expense.steps[1].status, StepStatus::Pending);

        ExpenseMachine::act(&mut expense, f, Decision::Approve, Some("ok".into())).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert_eq!(expense.steps[1].comment.as_deref(), Some("ok"));
        assert!(expense.steps[1].acted_at.is_some());
    }

    #[test]
    fn test_reject_is_immediately_terminal() {
        let (m, f) = (UserId::new(), UserId::new());
        let mut expense = expense(ResolutionMode::Sequential, &[m, f]);

        ExpenseMachine::act(&mut expense, m, Decision::Reject, Some("no receipt".into())).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Rejected);
        // The second step is never visited.
        assert_eq!(expense.steps[1].status, StepStatus::Waiting);
        assert!(expense.steps[1].acted_at.is_none());
    }

    #[test]
    fn test_act_out_of_turn_is_unauthorized() {
        let (m, f) = (UserId::new(), UserId::new());
        let mut expense = expense(ResolutionMode::Sequential, &[m, f]);

        let result = ExpenseMachine::act(&mut expense, f, Decision::Approve, None);
        assert!(matches!(
            result,
            Err(ApprovalError::Unauthorized { approver }) if approver == f
        ));
        assert_eq!(expense.steps[0].status, StepStatus::Pending);
        assert_eq!(expense.steps[1].status, StepStatus::Waiting);
    }

    #[test]
    fn test_replay_by_decided_approver_is_unauthorized() {
        let (m, f) = (UserId::new(), UserId::new());
        let mut expense = expense(ResolutionMode::Sequential, &[m, f]);

        ExpenseMachine::act(&mut expense, m, Decision::Approve, None).unwrap();
        let snapshot = expense.clone();

        let result = ExpenseMachine::act(&mut expense, m, Decision::Approve, None);
        assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
        assert_eq!(expense.status, snapshot.status);
        assert_eq!(expense.steps, snapshot.steps);
    }

    #[test]
    fn test_stranger_is_unauthorized() {
        let m = UserId::new();
        let mut expense = expense(ResolutionMode::Sequential, &[m]);

        let result = ExpenseMachine::act(&mut expense, UserId::new(), Decision::Approve, None);
        assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
    }

    #[test]
    fn test_terminal_expense_accepts_no_further_acts() {
        let m = UserId::new();
        let mut expense = expense(ResolutionMode::Sequential, &[m]);
        ExpenseMachine::act(&mut expense, m, Decision::Approve, None).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Approved);

        let result = ExpenseMachine::act(&mut expense, m, Decision::Approve, None);
        assert!(matches!(result, Err(ApprovalError::Unauthorized { .. })));
    }

    #[test]
    fn test_percentage_threshold_approves_early() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        let mut expense = expense(
            ResolutionMode::PercentageThreshold { threshold: 60 },
            &[a, b, c],
        );

        ExpenseMachine::act(&mut expense, a, Decision::Approve, None).unwrap();
        // 1/3 = 33.3% < 60: promote the next step.
        assert_eq!(expense.status, ExpenseStatus::InReview);
        assert_eq!(expense.steps[1].status, StepStatus::Pending);

        ExpenseMachine::act(&mut expense, b, Decision::Approve, None).unwrap();
        // 2/3 = 66.6% >= 60: approved with step 3 still waiting.
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert_eq!(expense.steps[2].status, StepStatus::Waiting);
    }

    #[test]
    fn test_percentage_exact_threshold_counts() {
        let (a, b) = (UserId::new(), UserId::new());
        let mut expense = expense(
            ResolutionMode::PercentageThreshold { threshold: 50 },
            &[a, b],
        );

        ExpenseMachine::act(&mut expense, a, Decision::Approve, None).unwrap();
        // 1/2 = 50% >= 50.
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert_eq!(expense.steps[1].status, StepStatus::Waiting);
    }

    #[test]
    fn test_percentage_reject_is_still_terminal() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        let mut expense = expense(
            ResolutionMode::PercentageThreshold { threshold: 30 },
            &[a, b, c],
        );

        ExpenseMachine::act(&mut expense, a, Decision::Reject, None).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Rejected);
    }

    #[test]
    fn test_percentage_all_steps_consumed_approves() {
        let (a, b) = (UserId::new(), UserId::new());
        let mut expense = expense(
            ResolutionMode::PercentageThreshold { threshold: 100 },
            &[a, b],
        );

        ExpenseMachine::act(&mut expense, a, Decision::Approve, None).unwrap();
        assert_eq!(expense.status, ExpenseStatus::InReview);
        ExpenseMachine::act(&mut expense, b, Decision::Approve, None).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Approved);
    }

    #[test]
    fn test_at_most_one_pending_step_throughout() {
        let approvers: Vec<UserId> = (0..4).map(|_| UserId::new()).collect();
        let mut expense = expense(ResolutionMode::Sequential, &approvers);

        for approver in &approvers {
            let pending = expense
                .steps
                .iter()
                .filter(|s| s.status == StepStatus::Pending)
                .count();
            assert_eq!(pending, 1);
            ExpenseMachine::act(&mut expense, *approver, Decision::Approve, None).unwrap();
        }
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert!(expense.pending_step().is_none());
    }
}
