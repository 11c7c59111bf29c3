//! Authorization rule for the content-history subsystem.
//!
//! Every history read and write goes through the same stateless check:
//! only admins and teacher-editors may see or append version records.
//! Students (and any future role) are denied. Centralizing the rule here
//! keeps the three ledger instances from drifting apart.

use crate::error::CoreError;
use crate::roles::UserRole;

/// Roles permitted to read and write entity history.
const ALLOWED_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::TeacherEditor];

/// Check whether `role` may access the history subsystem.
///
/// Returns `CoreError::Forbidden` for any role outside the permitted set.
/// Callers must perform this check before touching the ledger so a denied
/// request produces no stored record.
pub fn authorize_history_access(role: UserRole) -> Result<(), CoreError> {
    if ALLOWED_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' is not allowed to access entity history"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn admin_is_allowed() {
        assert!(authorize_history_access(UserRole::Admin).is_ok());
    }

    #[test]
    fn teacher_editor_is_allowed() {
        assert!(authorize_history_access(UserRole::TeacherEditor).is_ok());
    }

    #[test]
    fn student_is_denied() {
        assert_matches!(
            authorize_history_access(UserRole::Student),
            Err(CoreError::Forbidden(_))
        );
    }
}
