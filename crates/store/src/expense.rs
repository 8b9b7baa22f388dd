//! In-memory expense store.

use dashmap::DashMap;
use spendrail_core::directory::traits::ExpenseStore;
use spendrail_core::expense::types::Expense;
use spendrail_shared::types::{CompanyId, ExpenseId, UserId};

/// In-memory expense store.
///
/// List helpers return results ordered by creation time so callers see a
/// stable sequence regardless of map internals.
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    expenses: DashMap<ExpenseId, Expense>,
}

impl InMemoryExpenseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(&self, mut filter: impl FnMut(&Expense) -> bool) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        expenses.sort_by_key(|e| (e.created_at, e.id.into_inner()));
        expenses
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn save(&self, expense: Expense) {
        tracing::debug!(
            expense_id = %expense.id,
            status = %expense.status,
            "saving expense"
        );
        self.expenses.insert(expense.id, expense);
    }

    fn find(&self, id: ExpenseId) -> Option<Expense> {
        self.expenses.get(&id).map(|entry| entry.clone())
    }

    fn list_by_employee(&self, employee_id: UserId) -> Vec<Expense> {
        self.collect_sorted(|e| e.employee_id == employee_id)
    }

    fn list_by_approver(&self, approver_id: UserId) -> Vec<Expense> {
        self.collect_sorted(|e| e.has_approver(approver_id))
    }

    fn list_by_company(&self, company_id: CompanyId) -> Vec<Expense> {
        self.collect_sorted(|e| e.company_id == company_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use spendrail_core::expense::types::{
        ApprovalStep, ExpenseCategory, ExpenseStatus, StepStatus,
    };
    use spendrail_core::policy::types::ResolutionMode;
    use spendrail_shared::types::{Currency, Money};

    fn expense(employee_id: UserId, company_id: CompanyId) -> Expense {
        Expense {
            id: ExpenseId::new(),
            employee_id,
            company_id,
            amount: Money::new(dec!(12.00), Currency::Usd),
            normalized: Money::new(dec!(12.00), Currency::Usd),
            category: ExpenseCategory::Food,
            description: "lunch".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            status: ExpenseStatus::Submitted,
            resolution: ResolutionMode::Sequential,
            steps: Vec::new(),
            override_record: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_find() {
        let store = InMemoryExpenseStore::new();
        let expense = expense(UserId::new(), CompanyId::new());
        store.save(expense.clone());
        assert_eq!(store.find(expense.id).unwrap().id, expense.id);
        assert!(store.find(ExpenseId::new()).is_none());
    }

    #[test]
    fn test_save_replaces_existing() {
        let store = InMemoryExpenseStore::new();
        let mut expense = expense(UserId::new(), CompanyId::new());
        store.save(expense.clone());

        expense.status = ExpenseStatus::Approved;
        store.save(expense.clone());

        assert_eq!(
            store.find(expense.id).unwrap().status,
            ExpenseStatus::Approved
        );
    }

    #[test]
    fn test_list_by_employee_is_creation_ordered() {
        let store = InMemoryExpenseStore::new();
        let employee_id = UserId::new();
        let company_id = CompanyId::new();
        let first = expense(employee_id, company_id);
        let second = expense(employee_id, company_id);
        store.save(second.clone());
        store.save(first.clone());
        store.save(expense(UserId::new(), company_id));

        let listed = store.list_by_employee(employee_id);
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at <= listed[1].created_at);
    }

    #[test]
    fn test_list_by_approver_matches_steps() {
        let store = InMemoryExpenseStore::new();
        let approver_id = UserId::new();
        let mut with_step = expense(UserId::new(), CompanyId::new());
        with_step.steps.push(ApprovalStep {
            approver_id,
            order: 1,
            status: StepStatus::Pending,
            comment: None,
            acted_at: None,
        });
        store.save(with_step.clone());
        store.save(expense(UserId::new(), CompanyId::new()));

        let listed = store.list_by_approver(approver_id);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, with_step.id);
    }

    #[test]
    fn test_list_by_company_scopes() {
        let store = InMemoryExpenseStore::new();
        let company_id = CompanyId::new();
        store.save(expense(UserId::new(), company_id));
        store.save(expense(UserId::new(), company_id));
        store.save(expense(UserId::new(), CompanyId::new()));

        assert_eq!(store.list_by_company(company_id).len(), 2);
    }
}
