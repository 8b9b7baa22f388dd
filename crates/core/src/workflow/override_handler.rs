//! Administrative force-resolution.
//!
//! The override bypasses the step machine entirely: it does not inspect or
//! mutate step statuses, does not require a pending step, and applies even
//! to already-terminal expenses (last write wins). Whether the actor is
//! allowed to override is the calling layer's responsibility.

use chrono::Utc;
use spendrail_shared::types::UserId;

use crate::expense::types::{Expense, OverrideRecord, TerminalStatus};

/// Comment recorded when the administrator gives none.
const DEFAULT_COMMENT: &str = "Resolved by administrative override";

/// Stateless handler for forced terminal resolution.
pub struct OverrideHandler;

impl OverrideHandler {
    /// Forces the expense to the given terminal status and records the
    /// override audit trail.
    pub fn apply(
        expense: &mut Expense,
        actor_id: UserId,
        forced: TerminalStatus,
        comment: Option<String>,
    ) {
        expense.status = forced.into();
        expense.override_record = Some(OverrideRecord {
            actor_id,
            at: Utc::now(),
            comment: comment.unwrap_or_else(|| DEFAULT_COMMENT.to_string()),
        });
    }
}
