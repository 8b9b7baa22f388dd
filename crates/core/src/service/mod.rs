//! Upward-facing operations over injected collaborators.
//!
//! `ExpenseService` wires the pure components (converter, resolver,
//! builder, machine, override) to the collaborator traits and owns the
//! per-expense serialization boundary: every `act`/`override` is a
//! read-modify-write over one expense aggregate, so calls against the same
//! expense take an exclusive lock while calls against different expenses
//! proceed in parallel. Mutations run on a working copy and are saved only
//! on success, so a failed call leaves the stored aggregate untouched.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use spendrail_shared::types::{CompanyId, Currency, ExpenseId, Money, UserId};

use crate::currency::convert::CurrencyConverter;
use crate::directory::traits::{CompanyDirectory, ExpenseStore, OrgDirectory, PolicyStore};
use crate::directory::types::UserRole;
use crate::expense::types::{Decision, Expense, ExpenseCategory, ExpenseStatus, TerminalStatus};
use crate::policy::resolver::PolicyResolver;
use crate::policy::types::ResolutionMode;
use crate::workflow::error::ApprovalError;
use crate::workflow::machine::ExpenseMachine;
use crate::workflow::override_handler::OverrideHandler;
use crate::workflow::sequence::SequenceBuilder;

/// Input for submitting an expense claim.
#[derive(Debug, Clone)]
pub struct SubmitExpenseInput {
    /// The submitting employee.
    pub employee_id: UserId,
    /// The employee's company.
    pub company_id: CompanyId,
    /// Amount in the submission currency.
    pub amount: Decimal,
    /// Submission currency.
    pub currency: Currency,
    /// Expense category.
    pub category: ExpenseCategory,
    /// Free-form description.
    pub description: String,
    /// Date the expense was incurred.
    pub date: NaiveDate,
}

/// The approval-resolution engine's entry point.
pub struct ExpenseService {
    org: Arc<dyn OrgDirectory>,
    companies: Arc<dyn CompanyDirectory>,
    policies: Arc<dyn PolicyStore>,
    expenses: Arc<dyn ExpenseStore>,
    converter: CurrencyConverter,
    locks: DashMap<ExpenseId, Arc<Mutex<()>>>,
}

impl ExpenseService {
    /// Creates a service over the given collaborators.
    #[must_use]
    pub fn new(
        org: Arc<dyn OrgDirectory>,
        companies: Arc<dyn CompanyDirectory>,
        policies: Arc<dyn PolicyStore>,
        expenses: Arc<dyn ExpenseStore>,
        converter: CurrencyConverter,
    ) -> Self {
        Self {
            org,
            companies,
            policies,
            expenses,
            converter,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, id: ExpenseId) -> Arc<Mutex<()>> {
        self.locks.entry(id).or_default().clone()
    }

    /// Submits an expense: normalizes the amount, resolves the active
    /// policy into concrete approvers, and initializes the state machine.
    ///
    /// With no active policy (or nothing resolvable) the expense is stored
    /// with zero steps and stays `submitted`.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`/`CompanyNotFound` for dangling references.
    pub fn submit_expense(&self, input: SubmitExpenseInput) -> Result<Expense, ApprovalError> {
        let employee = self
            .org
            .find_user(input.employee_id)
            .ok_or(ApprovalError::UserNotFound(input.employee_id))?;
        let company = self
            .companies
            .get(input.company_id)
            .ok_or(ApprovalError::CompanyNotFound(input.company_id))?;

        let normalized = Money::new(
            self.converter
                .convert(input.amount, input.currency, company.currency),
            company.currency,
        );

        let policy = PolicyResolver::active_policy_for(self.policies.as_ref(), company.id);
        let (resolution, steps) = match &policy {
            Some(policy) => (
                policy.mode,
                SequenceBuilder::build(policy, &employee, self.org.as_ref()),
            ),
            None => (ResolutionMode::Sequential, Vec::new()),
        };

        let mut expense = Expense {
            id: ExpenseId::new(),
            employee_id: employee.id,
            company_id: company.id,
            amount: Money::new(input.amount, input.currency),
            normalized,
            category: input.category,
            description: input.description,
            date: input.date,
            status: ExpenseStatus::Submitted,
            resolution,
            steps: Vec::new(),
            override_record: None,
            created_at: Utc::now(),
        };

        let lock = self.lock_for(expense.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        ExpenseMachine::initialize(&mut expense, steps);
        self.expenses.save(expense.clone());
        Ok(expense)
    }

    /// Applies an approver's decision to their pending step.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` for an unknown expense and `Unauthorized`
    /// when the approver has no pending step.
    pub fn act_on_approval(
        &self,
        expense_id: ExpenseId,
        approver_id: UserId,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Expense, ApprovalError> {
        let lock = self.lock_for(expense_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut expense = self
            .expenses
            .find(expense_id)
            .ok_or(ApprovalError::ExpenseNotFound(expense_id))?;
        ExpenseMachine::act(&mut expense, approver_id, decision, comment)?;
        self.expenses.save(expense.clone());
        Ok(expense)
    }

    /// Forces the expense to a terminal status, bypassing the step machine.
    ///
    /// The core does not check the actor's role; callers gate who may
    /// override.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` for an unknown actor and `ExpenseNotFound`
    /// for an unknown expense.
    pub fn apply_override(
        &self,
        expense_id: ExpenseId,
        actor_id: UserId,
        forced: TerminalStatus,
        comment: Option<String>,
    ) -> Result<Expense, ApprovalError> {
        let actor = self
            .org
            .find_user(actor_id)
            .ok_or(ApprovalError::UserNotFound(actor_id))?;

        let lock = self.lock_for(expense_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut expense = self
            .expenses
            .find(expense_id)
            .ok_or(ApprovalError::ExpenseNotFound(expense_id))?;
        OverrideHandler::apply(&mut expense, actor.id, forced, comment);
        self.expenses.save(expense.clone());
        Ok(expense)
    }

    /// Lists the expenses visible to a user.
    ///
    /// - admin: every expense of the company
    /// - manager: direct reports' expenses, plus any expense where the
    ///   manager appears as an approver
    /// - everyone else: their own expenses
    #[must_use]
    pub fn list_visible_expenses(
        &self,
        role: UserRole,
        user_id: UserId,
        company_id: CompanyId,
    ) -> Vec<Expense> {
        match role {
            UserRole::Admin => self.expenses.list_by_company(company_id),
            UserRole::Manager => self
                .expenses
                .list_by_company(company_id)
                .into_iter()
                .filter(|expense| {
                    let reports_to_user = self
                        .org
                        .find_manager_of(expense.employee_id)
                        .is_some_and(|manager| manager.id == user_id);
                    reports_to_user || expense.has_approver(user_id)
                })
                .collect(),
            UserRole::Employee | UserRole::Finance | UserRole::Director => {
                self.expenses.list_by_employee(user_id)
            }
        }
    }
}
