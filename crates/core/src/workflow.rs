//! Proposed-project status constants, state machine, and the shared
//! authorization table.
//!
//! Every status change — whether it arrives through a phase-specific
//! operation (student submit, advisor review, head review, final approval)
//! or through the generic status endpoint — is resolved against the single
//! transition table in [`transition_authority`]. The table maps a
//! `(current, requested)` pair to the authority required to perform it, so
//! the authorization rules exist exactly once.

use crate::actor::Actor;
use crate::error::CoreError;
use crate::roles::{ROLE_DEAN, ROLE_DEPARTMENT_HEAD, ROLE_FACULTY_HEAD};
use crate::types::DbId;

/* --------------------------------------------------------------------------
Status constants
-------------------------------------------------------------------------- */

/// Initial state: the student has not yet submitted a topic.
pub const TOPIC_SUBMISSION_PENDING: &str = "TOPIC_SUBMISSION_PENDING";

/// Topic submitted, waiting for the advisor's verdict.
pub const TOPIC_PENDING_ADVISOR: &str = "TOPIC_PENDING_ADVISOR";

/// Advisor asked for changes to the topic; loops back to submission.
pub const TOPIC_REQUESTED_CHANGES: &str = "TOPIC_REQUESTED_CHANGES";

/// Advisor approved the topic; the outline phase may begin.
pub const TOPIC_APPROVED: &str = "TOPIC_APPROVED";

/// Outline explicitly requested but not yet submitted.
pub const OUTLINE_PENDING_SUBMISSION: &str = "OUTLINE_PENDING_SUBMISSION";

/// Outline submitted, waiting for the advisor's verdict.
pub const OUTLINE_PENDING_ADVISOR: &str = "OUTLINE_PENDING_ADVISOR";

/// Advisor asked for changes to the outline.
pub const OUTLINE_REQUESTED_CHANGES: &str = "OUTLINE_REQUESTED_CHANGES";

/// Advisor rejected the outline.
pub const OUTLINE_REJECTED: &str = "OUTLINE_REJECTED";

/// Advisor signed off on topic and outline; eligible for head review.
pub const ADVISOR_APPROVED: &str = "ADVISOR_APPROVED";

/// Queued for department/faculty head review.
pub const PENDING_HEAD: &str = "PENDING_HEAD";

/// Head asked for changes; loops back to the head queue after rework.
pub const REQUESTED_CHANGES_HEAD: &str = "REQUESTED_CHANGES_HEAD";

/// Terminal: rejected by the head.
pub const REJECTED_BY_HEAD: &str = "REJECTED_BY_HEAD";

/// Terminal: approved by the faculty head. Triggers materialization of the
/// official project.
pub const APPROVED_BY_HEAD: &str = "APPROVED_BY_HEAD";

/// All valid proposed-project status values.
pub const VALID_STATUSES: &[&str] = &[
    TOPIC_SUBMISSION_PENDING,
    TOPIC_PENDING_ADVISOR,
    TOPIC_REQUESTED_CHANGES,
    TOPIC_APPROVED,
    OUTLINE_PENDING_SUBMISSION,
    OUTLINE_PENDING_ADVISOR,
    OUTLINE_REQUESTED_CHANGES,
    OUTLINE_REJECTED,
    ADVISOR_APPROVED,
    PENDING_HEAD,
    REQUESTED_CHANGES_HEAD,
    REJECTED_BY_HEAD,
    APPROVED_BY_HEAD,
];

/// Statuses an advisor may set through the advisor-review operation.
pub const ADVISOR_REVIEW_STATUSES: &[&str] =
    &[TOPIC_APPROVED, TOPIC_REQUESTED_CHANGES, OUTLINE_REJECTED];

/// Statuses a department head may set through the head-review operation.
pub const HEAD_REVIEW_STATUSES: &[&str] =
    &[PENDING_HEAD, REQUESTED_CHANGES_HEAD, REJECTED_BY_HEAD];

/// Parent statuses in which the student may submit or edit the outline.
pub const OUTLINE_EDITABLE_PARENT_STATUSES: &[&str] = &[
    TOPIC_APPROVED,
    OUTLINE_PENDING_SUBMISSION,
    OUTLINE_REQUESTED_CHANGES,
    OUTLINE_PENDING_ADVISOR,
    ADVISOR_APPROVED,
];

/// Statuses from which the dean may forward a proposal to the head queue.
pub const ALLOCATION_APPROVABLE_STATUSES: &[&str] =
    &[ADVISOR_APPROVED, REQUESTED_CHANGES_HEAD];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid proposed project status '{status}'"
        )))
    }
}

/// Terminal states admit no further transitions.
pub fn is_terminal(status: &str) -> bool {
    status == REJECTED_BY_HEAD || status == APPROVED_BY_HEAD
}

/* --------------------------------------------------------------------------
Transition table
-------------------------------------------------------------------------- */

/// The authority required to perform a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// The ACTIVE STUDENT member of the project.
    StudentMember,
    /// The ACTIVE ADVISOR member of the project.
    AdvisorMember,
    /// A department head scoped to the advisor's department.
    DepartmentHead,
    /// A department head scoped to the advisor's department, or the dean.
    DepartmentHeadOrDean,
    /// A faculty head scoped to the advisor's department.
    FacultyHead,
}

/// The single authorization table: which authority may move a proposal from
/// `from` to `to`. `None` means the transition does not exist.
pub fn transition_authority(from: &str, to: &str) -> Option<Authority> {
    use Authority::*;
    match (from, to) {
        (TOPIC_SUBMISSION_PENDING, TOPIC_PENDING_ADVISOR) => Some(StudentMember),
        (TOPIC_REQUESTED_CHANGES, TOPIC_PENDING_ADVISOR) => Some(StudentMember),
        (TOPIC_PENDING_ADVISOR, TOPIC_APPROVED | TOPIC_REQUESTED_CHANGES) => {
            Some(AdvisorMember)
        }
        (
            TOPIC_APPROVED | OUTLINE_PENDING_SUBMISSION | OUTLINE_REQUESTED_CHANGES,
            OUTLINE_PENDING_ADVISOR,
        ) => Some(StudentMember),
        (
            OUTLINE_PENDING_ADVISOR,
            ADVISOR_APPROVED | OUTLINE_REQUESTED_CHANGES | OUTLINE_REJECTED,
        ) => Some(AdvisorMember),
        // The advisor may re-review a reworked outline without the student
        // resubmitting through the pending state.
        (OUTLINE_REQUESTED_CHANGES, ADVISOR_APPROVED | OUTLINE_REJECTED) => {
            Some(AdvisorMember)
        }
        (ADVISOR_APPROVED | REQUESTED_CHANGES_HEAD, PENDING_HEAD) => {
            Some(DepartmentHeadOrDean)
        }
        (PENDING_HEAD, REQUESTED_CHANGES_HEAD | REJECTED_BY_HEAD) => Some(DepartmentHead),
        (PENDING_HEAD, APPROVED_BY_HEAD) => Some(FacultyHead),
        _ => None,
    }
}

/// Check whether a transition from `from` to `to` exists.
pub fn can_transition(from: &str, to: &str) -> bool {
    transition_authority(from, to).is_some()
}

/// Validate a transition, returning the required authority.
///
/// Unknown status strings are a validation error; a missing edge is a
/// conflict (terminal states in particular have no outgoing edges, which is
/// what keeps materialization exactly-once).
pub fn validate_transition(from: &str, to: &str) -> Result<Authority, CoreError> {
    validate_status(to)?;
    if let Some(authority) = transition_authority(from, to) {
        return Ok(authority);
    }
    if is_terminal(from) {
        Err(CoreError::Conflict(format!(
            "Proposed project is already {from} and cannot change status"
        )))
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid status transition: {from} -> {to}"
        )))
    }
}

/* --------------------------------------------------------------------------
Authorizer
-------------------------------------------------------------------------- */

/// Everything the authorizer needs to know about the actor's relationship
/// to a proposal. Assembled by the caller from roster and faculty lookups;
/// membership flags must be computed over ACTIVE rows only.
#[derive(Debug, Clone)]
pub struct TransitionContext<'a> {
    pub actor: &'a Actor,
    /// Actor is the ACTIVE STUDENT member of the project.
    pub is_active_student: bool,
    /// Actor is the ACTIVE ADVISOR member of the project.
    pub is_active_advisor: bool,
    /// Department of the project's ACTIVE ADVISOR member.
    pub advisor_department_id: Option<DbId>,
    /// Department the actor is acting for: an explicit parameter when the
    /// operation carries one, otherwise the actor's own department.
    pub effective_department_id: Option<DbId>,
}

/// Check that the actor satisfies the required authority. The single
/// authorizer used by every status-changing operation.
pub fn authorize_transition(
    authority: Authority,
    ctx: &TransitionContext<'_>,
) -> Result<(), CoreError> {
    match authority {
        Authority::StudentMember => {
            if ctx.is_active_student {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "Only the project's active student member may perform this action"
                        .to_string(),
                ))
            }
        }
        Authority::AdvisorMember => {
            if ctx.is_active_advisor {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "Only the project's active advisor may perform this action".to_string(),
                ))
            }
        }
        Authority::DepartmentHead => {
            require_scoped_role(ctx, ROLE_DEPARTMENT_HEAD)
        }
        Authority::DepartmentHeadOrDean => {
            if ctx.actor.has_role(ROLE_DEAN) {
                Ok(())
            } else {
                require_scoped_role(ctx, ROLE_DEPARTMENT_HEAD)
            }
        }
        Authority::FacultyHead => require_scoped_role(ctx, ROLE_FACULTY_HEAD),
    }
}

/// Role check plus department scope: the department the actor is acting for
/// must match the advisor's department.
fn require_scoped_role(ctx: &TransitionContext<'_>, role: &str) -> Result<(), CoreError> {
    if !ctx.actor.has_role(role) {
        return Err(CoreError::Forbidden(format!("Role '{role}' required")));
    }
    let advisor_dept = ctx.advisor_department_id.ok_or_else(|| {
        CoreError::Forbidden(
            "Project has no active advisor with a resolvable department".to_string(),
        )
    })?;
    let acting_dept = ctx.effective_department_id.ok_or_else(|| {
        CoreError::Forbidden("Actor has no department scope".to_string())
    })?;
    if advisor_dept != acting_dept {
        return Err(CoreError::Forbidden(format!(
            "Department scope mismatch: acting for department {acting_dept}, \
             advisor belongs to department {advisor_dept}"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Field validation
-------------------------------------------------------------------------- */

/// Minimum length of a topic title.
pub const MIN_TITLE_LENGTH: usize = 4;

/// Maximum length of a topic title.
pub const MAX_TITLE_LENGTH: usize = 300;

/// Maximum length of a topic description.
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

/// Validate a topic title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len < MIN_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at least {MIN_TITLE_LENGTH} characters"
        )));
    }
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a topic description.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::USER_TYPE_FACULTY;

    fn actor(roles: &[&str], department_id: Option<DbId>) -> Actor {
        Actor {
            id: 42,
            user_type: USER_TYPE_FACULTY.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            department_id,
        }
    }

    fn ctx<'a>(
        actor: &'a Actor,
        is_active_student: bool,
        is_active_advisor: bool,
    ) -> TransitionContext<'a> {
        TransitionContext {
            actor,
            is_active_student,
            is_active_advisor,
            advisor_department_id: Some(3),
            effective_department_id: actor.department_id,
        }
    }

    // -----------------------------------------------------------------------
    // Transition table
    // -----------------------------------------------------------------------

    #[test]
    fn submission_to_pending_advisor() {
        assert!(can_transition(TOPIC_SUBMISSION_PENDING, TOPIC_PENDING_ADVISOR));
    }

    #[test]
    fn requested_changes_loops_back_to_pending_advisor() {
        assert!(can_transition(TOPIC_REQUESTED_CHANGES, TOPIC_PENDING_ADVISOR));
    }

    #[test]
    fn pending_advisor_to_approved() {
        assert!(can_transition(TOPIC_PENDING_ADVISOR, TOPIC_APPROVED));
    }

    #[test]
    fn pending_advisor_to_requested_changes() {
        assert!(can_transition(TOPIC_PENDING_ADVISOR, TOPIC_REQUESTED_CHANGES));
    }

    #[test]
    fn topic_approved_to_outline_pending_advisor() {
        assert!(can_transition(TOPIC_APPROVED, OUTLINE_PENDING_ADVISOR));
    }

    #[test]
    fn outline_pending_advisor_to_advisor_approved() {
        assert!(can_transition(OUTLINE_PENDING_ADVISOR, ADVISOR_APPROVED));
    }

    #[test]
    fn advisor_approved_to_pending_head() {
        assert!(can_transition(ADVISOR_APPROVED, PENDING_HEAD));
    }

    #[test]
    fn requested_changes_head_back_to_pending_head() {
        assert!(can_transition(REQUESTED_CHANGES_HEAD, PENDING_HEAD));
    }

    #[test]
    fn pending_head_to_final_states() {
        assert!(can_transition(PENDING_HEAD, REQUESTED_CHANGES_HEAD));
        assert!(can_transition(PENDING_HEAD, REJECTED_BY_HEAD));
        assert!(can_transition(PENDING_HEAD, APPROVED_BY_HEAD));
    }

    #[test]
    fn no_skipping_straight_to_head_approval() {
        assert!(!can_transition(TOPIC_SUBMISSION_PENDING, APPROVED_BY_HEAD));
        assert!(!can_transition(ADVISOR_APPROVED, APPROVED_BY_HEAD));
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for to in VALID_STATUSES {
            assert!(!can_transition(APPROVED_BY_HEAD, to));
            assert!(!can_transition(REJECTED_BY_HEAD, to));
        }
    }

    #[test]
    fn reapproving_terminal_project_is_conflict() {
        let err = validate_transition(APPROVED_BY_HEAD, APPROVED_BY_HEAD).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn unknown_target_status_is_validation_error() {
        let err = validate_transition(PENDING_HEAD, "SOMETHING_ELSE").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn missing_edge_is_conflict() {
        let err = validate_transition(TOPIC_APPROVED, PENDING_HEAD).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    // -----------------------------------------------------------------------
    // Authorizer
    // -----------------------------------------------------------------------

    #[test]
    fn student_member_authority_requires_active_student() {
        let a = actor(&[], None);
        assert!(authorize_transition(Authority::StudentMember, &ctx(&a, true, false)).is_ok());
        assert!(
            authorize_transition(Authority::StudentMember, &ctx(&a, false, false)).is_err()
        );
    }

    #[test]
    fn advisor_member_authority_requires_active_advisor() {
        let a = actor(&[], Some(3));
        assert!(authorize_transition(Authority::AdvisorMember, &ctx(&a, false, true)).is_ok());
        assert!(
            authorize_transition(Authority::AdvisorMember, &ctx(&a, false, false)).is_err()
        );
    }

    #[test]
    fn department_head_in_same_department_passes() {
        let a = actor(&[ROLE_DEPARTMENT_HEAD], Some(3));
        assert!(authorize_transition(Authority::DepartmentHead, &ctx(&a, false, false)).is_ok());
    }

    #[test]
    fn department_head_in_other_department_is_forbidden() {
        let a = actor(&[ROLE_DEPARTMENT_HEAD], Some(4));
        let err =
            authorize_transition(Authority::DepartmentHead, &ctx(&a, false, false)).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn department_head_without_role_is_forbidden() {
        let a = actor(&[], Some(3));
        assert!(
            authorize_transition(Authority::DepartmentHead, &ctx(&a, false, false)).is_err()
        );
    }

    #[test]
    fn dean_passes_head_or_dean_without_department_scope() {
        let a = actor(&[ROLE_DEAN], None);
        assert!(
            authorize_transition(Authority::DepartmentHeadOrDean, &ctx(&a, false, false))
                .is_ok()
        );
    }

    #[test]
    fn faculty_head_requires_matching_department() {
        let same = actor(&[ROLE_FACULTY_HEAD], Some(3));
        let other = actor(&[ROLE_FACULTY_HEAD], Some(9));
        assert!(authorize_transition(Authority::FacultyHead, &ctx(&same, false, false)).is_ok());
        assert!(
            authorize_transition(Authority::FacultyHead, &ctx(&other, false, false)).is_err()
        );
    }

    #[test]
    fn explicit_department_parameter_overrides_actor_department() {
        let a = actor(&[ROLE_FACULTY_HEAD], Some(9));
        let mut c = ctx(&a, false, false);
        c.effective_department_id = Some(3);
        assert!(authorize_transition(Authority::FacultyHead, &c).is_ok());
    }

    // -----------------------------------------------------------------------
    // Field validation
    // -----------------------------------------------------------------------

    #[test]
    fn short_title_rejected() {
        assert!(validate_title("abc").is_err());
    }

    #[test]
    fn reasonable_title_accepted() {
        assert!(validate_title("Graph-based intrusion detection").is_ok());
    }

    #[test]
    fn oversized_title_rejected() {
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn oversized_description_rejected() {
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[test]
    fn empty_description_accepted() {
        assert!(validate_description("").is_ok());
    }
}
