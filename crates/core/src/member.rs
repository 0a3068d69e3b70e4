//! Member role and status constants shared by the proposal workflow and
//! the allocation pipeline.
//!
//! Roster semantics: only ACTIVE rows are visible to permission checks;
//! REMOVED rows are permanent history and are never hard-deleted. Re-adding
//! a previously removed person reactivates the existing row.

use crate::error::CoreError;

/// The student who owns the thesis topic.
pub const MEMBER_ROLE_STUDENT: &str = "STUDENT";

/// The supervising lecturer.
pub const MEMBER_ROLE_ADVISOR: &str = "ADVISOR";

/// Group leader of a multi-student project.
pub const MEMBER_ROLE_LEADER: &str = "LEADER";

/// Plain group member.
pub const MEMBER_ROLE_MEMBER: &str = "MEMBER";

/// All valid member role values.
pub const VALID_MEMBER_ROLES: &[&str] = &[
    MEMBER_ROLE_STUDENT,
    MEMBER_ROLE_ADVISOR,
    MEMBER_ROLE_LEADER,
    MEMBER_ROLE_MEMBER,
];

/// Member is active and visible to permission checks.
pub const MEMBER_STATUS_ACTIVE: &str = "ACTIVE";

/// Member was removed; the row is kept as history.
pub const MEMBER_STATUS_REMOVED: &str = "REMOVED";

/// Roster action: add (or reactivate) a member.
pub const MEMBER_ACTION_ADD: &str = "add";

/// Roster action: soft-remove a member.
pub const MEMBER_ACTION_REMOVE: &str = "remove";

/// All valid roster actions.
pub const VALID_MEMBER_ACTIONS: &[&str] = &[MEMBER_ACTION_ADD, MEMBER_ACTION_REMOVE];

/// Validate that a member role string is one of the accepted values.
pub fn validate_member_role(role: &str) -> Result<(), CoreError> {
    if VALID_MEMBER_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid member role '{role}'. Must be one of: {}",
            VALID_MEMBER_ROLES.join(", ")
        )))
    }
}

/// Validate that a roster action string is one of the accepted values.
pub fn validate_member_action(action: &str) -> Result<(), CoreError> {
    if VALID_MEMBER_ACTIONS.contains(&action) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid member action '{action}'. Must be one of: {}",
            VALID_MEMBER_ACTIONS.join(", ")
        )))
    }
}
