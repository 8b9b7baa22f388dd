//! Org-chart domain types.

use serde::{Deserialize, Serialize};
use spendrail_shared::types::{CompanyId, Currency, UserId};

/// User role in the company.
///
/// `Admin`, `Manager` and `Employee` describe the org chart; `Finance` and
/// `Director` exist so role-addressed approval steps can name them as
/// closed variants rather than free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Company administrator.
    Admin,
    /// Manages direct reports and may approve their expenses.
    Manager,
    /// Submits expenses.
    Employee,
    /// Finance reviewer, addressable by role-based policy steps.
    Finance,
    /// Director, addressable by role-based policy steps.
    Director,
}

impl UserRole {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            "finance" => Some(Self::Finance),
            "director" => Some(Self::Director),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employee => "employee",
            Self::Finance => "finance",
            Self::Director => "director",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member of a company's org directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// The company the user belongs to.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Role in the company.
    pub role: UserRole,
    /// Direct manager, if any.
    pub manager_id: Option<UserId>,
    /// Whether the user may act as an approver.
    pub is_approver: bool,
}

/// A company and its base currency.
///
/// Immutable after creation as far as the engine is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Base currency all expenses are normalized into.
    pub currency: Currency,
}
