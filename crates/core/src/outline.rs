//! Proposal outline status constants, state machine, and field validation.
//!
//! The outline is the 1:1 narrative document attached to a proposed
//! project once its topic is approved. Its review lifecycle runs next to
//! the parent project's own state machine.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Status constants
-------------------------------------------------------------------------- */

/// Outline exists but has not been submitted for review.
pub const OUTLINE_DRAFT: &str = "DRAFT";

/// Outline submitted, waiting for a reviewer.
pub const OUTLINE_PENDING_REVIEW: &str = "PENDING_REVIEW";

/// Reviewer approved the outline.
pub const OUTLINE_APPROVED: &str = "APPROVED";

/// Reviewer asked for changes; loops back to draft.
pub const OUTLINE_REQUESTED_CHANGES: &str = "REQUESTED_CHANGES";

/// Terminal: reviewer rejected the outline.
pub const OUTLINE_REJECTED: &str = "REJECTED";

/// Terminal: outline locked for execution. No further edits or reviews.
pub const OUTLINE_LOCKED: &str = "LOCKED";

/// All valid outline status values.
pub const VALID_OUTLINE_STATUSES: &[&str] = &[
    OUTLINE_DRAFT,
    OUTLINE_PENDING_REVIEW,
    OUTLINE_APPROVED,
    OUTLINE_REQUESTED_CHANGES,
    OUTLINE_REJECTED,
    OUTLINE_LOCKED,
];

/// Statuses a reviewer may set through the review operation.
pub const OUTLINE_REVIEW_STATUSES: &[&str] = &[
    OUTLINE_APPROVED,
    OUTLINE_REQUESTED_CHANGES,
    OUTLINE_REJECTED,
];

/// Validate that an outline status string is one of the accepted values.
pub fn validate_outline_status(status: &str) -> Result<(), CoreError> {
    if VALID_OUTLINE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid outline status '{status}'"
        )))
    }
}

/// Terminal outline states admit no further edits or reviews.
pub fn is_terminal(status: &str) -> bool {
    status == OUTLINE_REJECTED || status == OUTLINE_LOCKED
}

/// Guard shared by submit and review: a terminal outline is immutable.
pub fn ensure_mutable(status: &str) -> Result<(), CoreError> {
    if is_terminal(status) {
        Err(CoreError::Conflict(format!(
            "Outline is {status} and can no longer be modified"
        )))
    } else {
        Ok(())
    }
}

/* --------------------------------------------------------------------------
State machine
-------------------------------------------------------------------------- */

/// Returns the set of statuses reachable from `from`.
pub fn valid_transitions(from: &str) -> &'static [&'static str] {
    match from {
        OUTLINE_DRAFT => &[OUTLINE_PENDING_REVIEW],
        OUTLINE_PENDING_REVIEW => &[
            OUTLINE_APPROVED,
            OUTLINE_REQUESTED_CHANGES,
            OUTLINE_REJECTED,
        ],
        OUTLINE_REQUESTED_CHANGES => &[OUTLINE_DRAFT, OUTLINE_PENDING_REVIEW],
        // A re-submitted outline after approval goes back through review;
        // locking is the separate privileged action.
        OUTLINE_APPROVED => &[OUTLINE_LOCKED, OUTLINE_DRAFT, OUTLINE_PENDING_REVIEW],
        // Terminal.
        OUTLINE_REJECTED | OUTLINE_LOCKED => &[],
        _ => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: &str, to: &str) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate an outline transition.
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_outline_status(to)?;
    if can_transition(from, to) {
        Ok(())
    } else if is_terminal(from) {
        Err(CoreError::Conflict(format!(
            "Outline is {from} and can no longer change status"
        )))
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid outline status transition: {from} -> {to}"
        )))
    }
}

/* --------------------------------------------------------------------------
Field validation
-------------------------------------------------------------------------- */

/// Maximum length of each narrative field.
pub const MAX_NARRATIVE_FIELD_LENGTH: usize = 10_000;

/// Validate one narrative field (introduction, objectives, method,
/// expected results).
pub fn validate_narrative_field(name: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_NARRATIVE_FIELD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Field '{name}' must be at most {MAX_NARRATIVE_FIELD_LENGTH} characters"
        )));
    }
    Ok(())
}
