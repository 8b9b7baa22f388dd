//! Approval-sequence construction.
//!
//! Turns a policy's abstract steps into concrete approval steps bound to
//! real users. Steps that cannot be resolved are dropped, never inserted
//! as waiting-forever placeholders, and the survivors are renumbered into
//! a contiguous 1..N sequence.

use spendrail_shared::types::UserId;

use crate::directory::traits::OrgDirectory;
use crate::directory::types::User;
use crate::expense::types::{ApprovalStep, StepStatus};
use crate::policy::types::{ApprovalPolicy, StepRule};

/// Stateless builder resolving policy steps against the org directory.
pub struct SequenceBuilder;

impl SequenceBuilder {
    /// Resolves the policy's steps for the given employee.
    ///
    /// Resolution per rule:
    /// - `Manager`: the employee's direct manager, only if flagged approver
    /// - `Role`: the first approver-flagged company user with that role,
    ///   in directory insertion order
    /// - `SpecificUser`: the referenced user, approver flag not required
    ///
    /// The first resolved step starts `pending`, all later ones `waiting`.
    /// An empty result means the expense gets zero steps.
    #[must_use]
    pub fn build(
        policy: &ApprovalPolicy,
        employee: &User,
        directory: &dyn OrgDirectory,
    ) -> Vec<ApprovalStep> {
        let mut ordered: Vec<_> = policy.steps.iter().collect();
        ordered.sort_by_key(|step| step.order);

        let mut steps: Vec<ApprovalStep> = Vec::new();
        for policy_step in ordered {
            let resolved = Self::resolve_rule(&policy_step.rule, policy, employee, directory);
            if let Some(approver_id) = resolved {
                let status = if steps.is_empty() {
                    StepStatus::Pending
                } else {
                    StepStatus::Waiting
                };
                steps.push(ApprovalStep {
                    approver_id,
                    order: u32::try_from(steps.len() + 1).unwrap_or(u32::MAX),
                    status,
                    comment: None,
                    acted_at: None,
                });
            }
        }
        steps
    }

    fn resolve_rule(
        rule: &StepRule,
        policy: &ApprovalPolicy,
        employee: &User,
        directory: &dyn OrgDirectory,
    ) -> Option<UserId> {
        match rule {
            StepRule::Manager => directory
                .find_manager_of(employee.id)
                .filter(|manager| manager.is_approver)
                .map(|manager| manager.id),
            StepRule::Role(role) => directory
                .find_by_role(policy.company_id, *role)
                .into_iter()
                .find(|user| user.is_approver)
                .map(|user| user.id),
            StepRule::SpecificUser(user_id) => directory.find_user(*user_id).map(|user| user.id),
        }
    }
}
