//! Property-based tests for the expense state machine.
//!
//! These validate the structural invariants of the approval sequence under
//! randomized decision orders and resolution modes.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;
use spendrail_shared::types::{CompanyId, Currency, ExpenseId, Money, UserId};

use crate::expense::types::{
    ApprovalStep, Decision, Expense, ExpenseCategory, ExpenseStatus, StepStatus,
};
use crate::policy::types::ResolutionMode;
use crate::workflow::error::ApprovalError;
use crate::workflow::machine::ExpenseMachine;

/// Strategy for resolution modes with valid thresholds.
fn arb_mode() -> impl Strategy<Value = ResolutionMode> {
    prop_oneof![
        Just(ResolutionMode::Sequential),
        (1u8..=100).prop_map(|threshold| ResolutionMode::PercentageThreshold { threshold }),
    ]
}

/// Strategy for per-step decisions.
fn arb_decisions(len: usize) -> impl Strategy<Value = Vec<Decision>> {
    prop::collection::vec(
        prop_oneof![Just(Decision::Approve), Just(Decision::Reject)],
        len,
    )
}

fn expense_with(mode: ResolutionMode, approver_count: usize) -> (Expense, Vec<UserId>) {
    let approvers: Vec<UserId> = (0..approver_count).map(|_| UserId::new()).collect();
    let steps: Vec<ApprovalStep> = approvers
        .iter()
        .enumerate()
        .map(|(idx, approver_id)| ApprovalStep {
            approver_id: *approver_id,
            order: u32::try_from(idx + 1).unwrap(),
            status: if idx == 0 {
                StepStatus::Pending
            } else {
                StepStatus::Waiting
            },
            comment: None,
            acted_at: None,
        })
        .collect();

    let mut expense = Expense {
        id: ExpenseId::new(),
        employee_id: UserId::new(),
        company_id: CompanyId::new(),
        amount: Money::new(dec!(75.50), Currency::Gbp),
        normalized: Money::new(dec!(95.89), Currency::Usd),
        category: ExpenseCategory::Office,
        description: "keyboard".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        status: ExpenseStatus::Submitted,
        resolution: mode,
        steps: Vec::new(),
        override_record: None,
        created_at: Utc::now(),
    };
    ExpenseMachine::initialize(&mut expense, steps);
    (expense, approvers)
}

fn pending_count(expense: &Expense) -> usize {
    expense
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Pending)
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// At most one step is pending at any instant; exactly one while the
    /// expense is in review, zero once terminal.
    #[test]
    fn prop_at_most_one_pending_step(
        mode in arb_mode(),
        count in 1usize..6,
        decisions in arb_decisions(6)
    ) {
        let (mut expense, approvers) = expense_with(mode, count);

        for (approver, decision) in approvers.iter().zip(decisions.iter()) {
            if expense.status.is_terminal() {
                break;
            }
            let _ = ExpenseMachine::act(&mut expense, *approver, *decision, None);

            let pending = pending_count(&expense);
            match expense.status {
                ExpenseStatus::InReview => prop_assert_eq!(pending, 1),
                ExpenseStatus::Submitted => prop_assert_eq!(pending, 0),
                ExpenseStatus::Approved | ExpenseStatus::Rejected => {
                    prop_assert_eq!(pending, 0);
                }
            }
        }
    }

    /// A second act from an approver whose step is no longer pending
    /// always fails Unauthorized and leaves the expense unchanged.
    #[test]
    fn prop_replay_fails_and_preserves_state(
        mode in arb_mode(),
        count in 1usize..6,
        decision in prop_oneof![Just(Decision::Approve), Just(Decision::Reject)]
    ) {
        let (mut expense, approvers) = expense_with(mode, count);
        let first = approvers[0];

        ExpenseMachine::act(&mut expense, first, decision, None).unwrap();
        let snapshot = expense.clone();

        let result = ExpenseMachine::act(&mut expense, first, Decision::Approve, None);
        let is_unauthorized = matches!(result, Err(ApprovalError::Unauthorized { .. }));
        prop_assert!(is_unauthorized);
        prop_assert_eq!(expense.status, snapshot.status);
        prop_assert_eq!(expense.steps, snapshot.steps);
    }

    /// Rejection is terminal immediately, regardless of mode or position.
    #[test]
    fn prop_reject_is_terminal(
        mode in arb_mode(),
        count in 1usize..6,
        approvals_before in 0usize..5
    ) {
        let (mut expense, approvers) = expense_with(mode, count);

        for approver in approvers.iter().take(approvals_before.min(count - 1)) {
            if expense.status.is_terminal() {
                break;
            }
            ExpenseMachine::act(&mut expense, *approver, Decision::Approve, None).unwrap();
        }

        if let Some(step) = expense.pending_step() {
            let approver = step.approver_id;
            ExpenseMachine::act(&mut expense, approver, Decision::Reject, None).unwrap();
            prop_assert_eq!(expense.status, ExpenseStatus::Rejected);
        }
    }

    /// Approving every step in order always ends in Approved, and step
    /// orders stay a contiguous 1..=N sequence throughout.
    #[test]
    fn prop_full_approval_terminates_approved(
        mode in arb_mode(),
        count in 1usize..6
    ) {
        let (mut expense, approvers) = expense_with(mode, count);

        for approver in &approvers {
            if expense.status.is_terminal() {
                break;
            }
            ExpenseMachine::act(&mut expense, *approver, Decision::Approve, None).unwrap();
        }

        prop_assert_eq!(expense.status, ExpenseStatus::Approved);
        for (idx, step) in expense.steps.iter().enumerate() {
            prop_assert_eq!(step.order as usize, idx + 1);
        }
    }
}
