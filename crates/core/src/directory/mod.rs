//! Org-chart types and the collaborator contracts the engine consumes.
//!
//! The engine never owns user, company, policy, or expense storage; it
//! reaches all of them through the traits defined here.

pub mod traits;
pub mod types;

pub use traits::{CompanyDirectory, ExpenseStore, OrgDirectory, PolicyStore};
pub use types::{Company, User, UserRole};
