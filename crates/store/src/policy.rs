//! In-memory policy store.

use std::sync::{PoisonError, RwLock};

use spendrail_core::directory::traits::PolicyStore;
use spendrail_core::policy::types::ApprovalPolicy;
use spendrail_core::workflow::error::ApprovalError;
use spendrail_shared::types::CompanyId;

/// In-memory policy store.
///
/// The write path owns the activation invariant: saving an active policy
/// deactivates every prior active policy for that company, so
/// `active_for` always has at most one candidate (last writer wins).
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policies: RwLock<Vec<ApprovalPolicy>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and saves a policy.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::InvalidPolicyStep` for malformed policy
    /// configuration (e.g., an out-of-range percentage threshold).
    pub fn save(&self, policy: ApprovalPolicy) -> Result<(), ApprovalError> {
        policy.validate()?;
        tracing::debug!(
            policy_id = %policy.id,
            company_id = %policy.company_id,
            active = policy.is_active,
            "saving approval policy"
        );

        let mut policies = self
            .policies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if policy.is_active {
            for existing in policies
                .iter_mut()
                .filter(|p| p.company_id == policy.company_id && p.id != policy.id)
            {
                existing.is_active = false;
            }
        }
        if let Some(slot) = policies.iter_mut().find(|p| p.id == policy.id) {
            *slot = policy;
        } else {
            policies.push(policy);
        }
        Ok(())
    }
}

impl PolicyStore for InMemoryPolicyStore {
    fn active_for(&self, company_id: CompanyId) -> Option<ApprovalPolicy> {
        self.policies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.company_id == company_id && p.is_active)
            .cloned()
    }
}
