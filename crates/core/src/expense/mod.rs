//! Expense aggregate and its step/status types.

pub mod types;

pub use types::{
    ApprovalStep, Decision, Expense, ExpenseCategory, ExpenseStatus, OverrideRecord, StepStatus,
    TerminalStatus,
};
