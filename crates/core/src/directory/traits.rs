//! Collaborator contracts.
//!
//! These traits are the engine's only view of storage. Implementations
//! decide where the data lives; the engine only requires that
//! `find_by_role` returns users in a stable, insertion-ordered sequence so
//! role-based step resolution is deterministic.

use spendrail_shared::types::{CompanyId, ExpenseId, UserId};

use crate::directory::types::{Company, User, UserRole};
use crate::expense::types::Expense;
use crate::policy::types::ApprovalPolicy;

/// Read access to the org chart.
pub trait OrgDirectory: Send + Sync {
    /// Looks up a user by id.
    fn find_user(&self, id: UserId) -> Option<User>;

    /// Returns the direct manager of the given user, if any.
    fn find_manager_of(&self, id: UserId) -> Option<User>;

    /// Returns all users of the company with the given role, in insertion order.
    fn find_by_role(&self, company_id: CompanyId, role: UserRole) -> Vec<User>;
}

/// Read access to companies.
pub trait CompanyDirectory: Send + Sync {
    /// Looks up a company by id.
    fn get(&self, id: CompanyId) -> Option<Company>;
}

/// Read access to approval policies.
///
/// The write path (not part of this contract) must enforce that activating
/// a policy deactivates all prior active policies for the company.
pub trait PolicyStore: Send + Sync {
    /// Returns the single active policy for the company, if one exists.
    fn active_for(&self, company_id: CompanyId) -> Option<ApprovalPolicy>;
}

/// Storage for expense aggregates.
pub trait ExpenseStore: Send + Sync {
    /// Persists the expense (insert or replace).
    fn save(&self, expense: Expense);

    /// Looks up an expense by id.
    fn find(&self, id: ExpenseId) -> Option<Expense>;

    /// Lists expenses submitted by the given employee.
    fn list_by_employee(&self, employee_id: UserId) -> Vec<Expense>;

    /// Lists expenses where the given user appears as an approver.
    fn list_by_approver(&self, approver_id: UserId) -> Vec<Expense>;

    /// Lists all expenses of the company.
    fn list_by_company(&self, company_id: CompanyId) -> Vec<Expense>;
}
