//! Active-policy resolution.

use spendrail_shared::types::CompanyId;

use crate::directory::traits::PolicyStore;
use crate::policy::types::ApprovalPolicy;

/// Stateless resolver for a company's active approval policy.
pub struct PolicyResolver;

impl PolicyResolver {
    /// Returns the company's single active policy, steps normalized into
    /// declared order, or `None` when the company has no active policy.
    ///
    /// Absence is not an error: downstream the expense simply receives
    /// zero approval steps and stays `submitted`.
    #[must_use]
    pub fn active_policy_for(
        store: &dyn PolicyStore,
        company_id: CompanyId,
    ) -> Option<ApprovalPolicy> {
        let mut policy = store.active_for(company_id).filter(|p| p.is_active)?;
        policy.steps.sort_by_key(|step| step.order);
        Some(policy)
    }
}
