//! Platform user roles and the acting-user record.
//!
//! Role names must match the seed data in the `users` table of the consuming
//! platform. The history subsystem never resolves credentials itself; it
//! receives an already-authenticated [`Actor`] from the request layer.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER_EDITOR: &str = "teacher_editor";
pub const ROLE_STUDENT: &str = "student";

/// A platform user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    TeacherEditor,
    Student,
}

impl UserRole {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::TeacherEditor => ROLE_TEACHER_EDITOR,
            Self::Student => ROLE_STUDENT,
        }
    }

    /// Parse a role from its stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_TEACHER_EDITOR => Some(Self::TeacherEditor),
            ROLE_STUDENT => Some(Self::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The already-authenticated user performing a history operation.
///
/// The display name and role are denormalized into every version record so
/// the audit trail stays readable even if the user row later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: DbId,
    pub display_name: String,
    pub role: UserRole,
}
