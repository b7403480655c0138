//! Caller identity and role model used for authorization decisions.
//!
//! The surrounding request layer authenticates the caller and hands a
//! [`ReportingUser`] plus the [`ProjectDetails`] of the addressed project to
//! every handler. Nothing here is read from global state.

pub mod policy;

use serde::{Deserialize, Serialize};

pub use policy::{authorize_item_deletion, authorize_widget_administration};

/// Global (instance-wide) user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrator,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "administrator" | "admin" => Some(Self::Administrator),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// Role of a user within one project. Variants are ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Customer,
    Member,
    ProjectManager,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Member => "member",
            Self::ProjectManager => "project_manager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "member" => Some(Self::Member),
            "project_manager" => Some(Self::ProjectManager),
            _ => None,
        }
    }

    pub fn lower_than(&self, other: ProjectRole) -> bool {
        *self < other
    }
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The project a request is addressed to, with the caller's role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_id: i64,
    pub project_name: String,
    pub project_role: ProjectRole,
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingUser {
    pub user_id: i64,
    pub username: String,
    pub user_role: UserRole,
}

impl ReportingUser {
    /// Check if the caller has the global administrator role.
    pub fn is_admin(&self) -> bool {
        matches!(self.user_role, UserRole::Administrator)
    }
}
