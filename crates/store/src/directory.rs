//! In-memory org and company directories.

use std::sync::RwLock;

use dashmap::DashMap;
use spendrail_core::directory::traits::{CompanyDirectory, OrgDirectory};
use spendrail_core::directory::types::{Company, User, UserRole};
use spendrail_shared::types::{CompanyId, UserId};

/// Insertion-ordered in-memory org directory.
///
/// A `Vec` under a read-write lock rather than a hash map: `find_by_role`
/// must return users in a stable insertion order.
#[derive(Debug, Default)]
pub struct InMemoryOrgDirectory {
    users: RwLock<Vec<User>>,
}

impl InMemoryOrgDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub fn upsert(&self, user: User) {
        tracing::debug!(user_id = %user.id, role = %user.role, "upserting user");
        let mut users = self.users.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(slot) = users.iter_mut().find(|u| u.id == user.id) {
            *slot = user;
        } else {
            users.push(user);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OrgDirectory for InMemoryOrgDirectory {
    fn find_user(&self, id: UserId) -> Option<User> {
        self.read().iter().find(|u| u.id == id).cloned()
    }

    fn find_manager_of(&self, id: UserId) -> Option<User> {
        let manager_id = self.find_user(id)?.manager_id?;
        self.find_user(manager_id)
    }

    fn find_by_role(&self, company_id: CompanyId, role: UserRole) -> Vec<User> {
        self.read()
            .iter()
            .filter(|u| u.company_id == company_id && u.role == role)
            .cloned()
            .collect()
    }
}

/// In-memory company directory.
#[derive(Debug, Default)]
pub struct InMemoryCompanyDirectory {
    companies: DashMap<CompanyId, Company>,
}

impl InMemoryCompanyDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a company.
    pub fn upsert(&self, company: Company) {
        tracing::debug!(company_id = %company.id, "upserting company");
        self.companies.insert(company.id, company);
    }
}

impl CompanyDirectory for InMemoryCompanyDirectory {
    fn get(&self, id: CompanyId) -> Option<Company> {
        self.companies.get(&id).map(|entry| entry.clone())
    }
}
